//! Record types persisted by the history store.
//!
//! - [`MsgRecord`] - the composite telemetry message (header, flag, sub payload)
//! - [`MessageHeader`] - header-only record carrying just the receive time
//! - [`MsgFlag`] / [`SubFlag`] - known discriminator values; unknown bytes are kept raw
//!
//! Every record kind that can be stored implements [`HistoryRecord`], which ties the
//! fixed binary layout from [`crate::codec`] to a category and a receive-time key.

pub mod category;
pub mod record;

pub use record::{MessageHeader, MsgFlag, MsgRecord, SubFlag, SubPayload};

use crate::codec::FixedRecord;

/// A fixed-layout record that the store can persist and the live index can key.
pub trait HistoryRecord: FixedRecord + Send + 'static {
    /// Category name used for the directory and the file extension.
    const CATEGORY: &'static str;

    /// Epoch seconds (UTC) at which the record was received. Uniqueness key.
    fn receive_time(&self) -> u32;
}
