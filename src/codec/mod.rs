//! Fixed-layout binary codec for history records
//!
//! Every record kind has a compile-time constant size and a flat, 1-byte aligned
//! wire layout with no padding and no length prefixes. Multi-byte integers are
//! little-endian on every platform.
//!
//! Decoding is relaxed: buffers longer than the record size are accepted and the
//! trailing bytes are ignored. Buffers that are too short fail with
//! [`DecodeError::InvalidLength`]. No other validation happens, so unknown flag
//! values decode verbatim.

mod wire;

use bytemuck::Pod;

/// Errors produced while decoding a single record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid data length for {record}: expected at least {expected} bytes, got {actual}")]
    InvalidLength { record: &'static str, expected: usize, actual: usize },
}

/// A record with a constant-size binary representation.
pub trait FixedRecord: Sized + Copy {
    /// Exact number of bytes produced by [`FixedRecord::encode`].
    const SIZE: usize;

    fn encode(&self) -> Vec<u8>;

    fn decode(bytes: &[u8]) -> Result<Self, DecodeError>;
}

/// Reads a `P` from the start of `bytes`, ignoring anything past its size.
fn read_prefix<P: Pod>(bytes: &[u8], record: &'static str) -> Result<P, DecodeError> {
    let expected = size_of::<P>();
    if bytes.len() < expected {
        return Err(DecodeError::InvalidLength { record, expected, actual: bytes.len() });
    }
    Ok(bytemuck::pod_read_unaligned(&bytes[..expected]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MessageHeader, MsgRecord, SubPayload};

    #[test]
    fn test_sizes() {
        assert_eq!(MsgRecord::SIZE, 8);
        assert_eq!(MessageHeader::SIZE, 4);
    }

    #[test]
    fn test_encode_layout_is_little_endian_and_packed() {
        let record = MsgRecord::new(0x0102_0304, 0x02, SubPayload::new(0x0A, 0x0B, 0x0C));
        assert_eq!(record.encode(), vec![0x04, 0x03, 0x02, 0x01, 0x02, 0x0A, 0x0B, 0x0C]);
        assert_eq!(MessageHeader::new(0x0102_0304).encode(), vec![0x04, 0x03, 0x02, 0x01]);
    }

    #[test]
    fn test_roundtrip() {
        let records = [
            MsgRecord::default(),
            MsgRecord::new(1_700_000_000, 0x01, SubPayload::new(0x0A, 0x0B, 0x0C)),
            MsgRecord::new(u32::MAX, 0xFF, SubPayload::new(0x00, 0x99, 0xFF)),
        ];
        for record in records {
            let bytes = record.encode();
            assert_eq!(bytes.len(), MsgRecord::SIZE);
            assert_eq!(MsgRecord::decode(&bytes), Ok(record));
        }

        let header = MessageHeader::new(123_456);
        assert_eq!(MessageHeader::decode(&header.encode()), Ok(header));
    }

    #[test]
    fn test_decode_short_buffer_fails() {
        for len in 0..MsgRecord::SIZE {
            let err = MsgRecord::decode(&vec![0u8; len]).unwrap_err();
            assert_eq!(
                err,
                DecodeError::InvalidLength { record: "MsgRecord", expected: 8, actual: len }
            );
        }
        assert!(MessageHeader::decode(&[1, 2, 3]).is_err());
    }

    #[test]
    fn test_decode_ignores_trailing_bytes() {
        let record = MsgRecord::new(77, 0x03, SubPayload::new(0x0C, 0x0C, 0x0A));
        let mut bytes = record.encode();
        bytes.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(MsgRecord::decode(&bytes), Ok(record));
    }

    #[test]
    fn test_header_decodes_from_full_record() {
        // A full record starts with its header, so the header view reads cleanly.
        let record = MsgRecord::new(987, 0x01, SubPayload::default());
        assert_eq!(MessageHeader::decode(&record.encode()), Ok(record.header));
    }

    #[test]
    fn test_error_message() {
        let err = MsgRecord::decode(&[0u8; 3]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid data length for MsgRecord: expected at least 8 bytes, got 3"
        );
    }
}
