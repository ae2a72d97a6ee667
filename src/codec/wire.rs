//! On-disk representations. Built only from byte arrays so alignment is 1 and
//! `bytemuck` can prove there is no padding.

use bytemuck::{Pod, Zeroable};

use super::{DecodeError, FixedRecord, read_prefix};
use crate::models::{MessageHeader, MsgRecord, SubPayload};

/// receive_time (4, LE)
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct RawHeader {
    receive_time: [u8; 4],
}

/// header (4) | flag (1) | sts (1) | sas (1) | scs (1)
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct RawMsgRecord {
    header: RawHeader,
    flag: u8,
    sub_payload: [u8; 3],
}

const _: () = assert!(size_of::<RawHeader>() == 4);
const _: () = assert!(size_of::<RawMsgRecord>() == 8);

impl From<&MessageHeader> for RawHeader {
    fn from(header: &MessageHeader) -> Self {
        Self { receive_time: header.receive_time.to_le_bytes() }
    }
}

impl From<RawHeader> for MessageHeader {
    fn from(raw: RawHeader) -> Self {
        Self { receive_time: u32::from_le_bytes(raw.receive_time) }
    }
}

impl FixedRecord for MessageHeader {
    const SIZE: usize = size_of::<RawHeader>();

    fn encode(&self) -> Vec<u8> {
        bytemuck::bytes_of(&RawHeader::from(self)).to_vec()
    }

    fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        read_prefix::<RawHeader>(bytes, "MessageHeader").map(Self::from)
    }
}

impl FixedRecord for MsgRecord {
    const SIZE: usize = size_of::<RawMsgRecord>();

    fn encode(&self) -> Vec<u8> {
        let SubPayload { sts, sas, scs } = self.sub_payload;
        let raw = RawMsgRecord {
            header: RawHeader::from(&self.header),
            flag: self.flag,
            sub_payload: [sts, sas, scs],
        };
        bytemuck::bytes_of(&raw).to_vec()
    }

    fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let raw = read_prefix::<RawMsgRecord>(bytes, "MsgRecord")?;
        let [sts, sas, scs] = raw.sub_payload;
        Ok(Self {
            header: MessageHeader::from(raw.header),
            flag: raw.flag,
            sub_payload: SubPayload { sts, sas, scs },
        })
    }
}
