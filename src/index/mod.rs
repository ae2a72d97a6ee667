//! In-memory view of a category's history
//!
//! [`LiveIndex`] is the single authoritative set of records for a category. Two
//! producers feed it:
//!
//! - the one-time bulk load from [`crate::store::HistoryStore::load_all`]
//! - an unbounded live stream of newly ingested records, drained on a worker thread
//!   started by [`LiveIndex::subscribe_and_merge`]
//!
//! Both go through [`LiveIndex::insert_if_absent`], keyed by receive time, so
//! whichever copy of a given second arrives first is kept and the other is dropped.
//! The live subscription must be in place before the bulk load starts; the channel
//! buffers anything ingested during the scan.

pub mod live;
pub mod subscription;

pub use live::LiveIndex;
pub use subscription::{LiveSender, LiveSubscription, live_channel};
