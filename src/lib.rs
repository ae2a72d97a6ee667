//! Record History - persist and query fixed-layout telemetry records
//!
//! Each ingested record is written to its own file under a per-category directory,
//! named after its receive time, and kept in an in-memory, deduplicated index that
//! answers time-range queries. It provides:
//!
//! - A fixed-size, little-endian binary codec for record types ([`codec`])
//! - Timestamp-encoded file naming and category directories ([`utils::paths`])
//! - A file-per-record store with ordered, corruption-tolerant loading ([`store`])
//! - A receive-time keyed index merging bulk loads with a live stream ([`index`])
//!
//! # Example
//!
//! ```no_run
//! use record_history::index::live_channel;
//! use record_history::models::{MsgRecord, SubPayload};
//! use record_history::service::{HistoryService, ServiceOptions};
//! use record_history::store::HistoryStore;
//!
//! let (tx, rx) = live_channel();
//! let store = HistoryStore::new("/var/lib/record-history");
//! let service = HistoryService::<MsgRecord>::start(store, rx, ServiceOptions::default())?;
//!
//! tx.send(MsgRecord::new(1_700_000_000, 0x01, SubPayload::new(0x0A, 0x0B, 0x0C)))?;
//! println!("{} records indexed", service.index().len());
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cli;
pub mod codec;
pub mod config;
pub mod index;
pub mod logging;
pub mod models;
pub mod service;
pub mod store;
pub mod utils;

// Re-export commonly used types
pub use codec::{DecodeError, FixedRecord};
pub use index::{LiveIndex, live_channel};
pub use models::{HistoryRecord, MessageHeader, MsgRecord, SubPayload};
pub use service::{HistoryService, ServiceOptions};
pub use store::{HistoryStore, StoreError};
