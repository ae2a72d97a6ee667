//! On-disk history: one file per record
//!
//! Files live under `<root>/<category>/` and are named after the record's receive
//! time (see [`crate::utils::paths`]). Files are written once and never rewritten;
//! the only deletion is the age-based [`HistoryStore::purge_older_than`].
//!
//! # Error Handling Strategy
//!
//! Partial failure is the normal case, not the exception:
//!
//! - **Per-file isolation**: a truncated, unreadable or vanished file is logged and
//!   skipped. The rest of the category still loads, in order.
//! - **Per-call absorption**: [`HistoryStore::persist`], [`HistoryStore::load_all`],
//!   [`HistoryStore::available_dates`] and [`HistoryStore::purge_older_than`] never
//!   fail; errors become `tracing` events and the affected unit is dropped.
//! - **Opt-in propagation**: `try_persist` and `try_load_all` return [`StoreError`]
//!   for callers that need to react to a failed write or an unreadable directory.

mod error;
mod persistence;
mod scan;

use std::path::{Path, PathBuf};

pub use error::StoreError;
pub use persistence::read_record;
pub use scan::StoredFile;

use crate::utils::PathScheme;

/// Handle to a history tree rooted at one directory
///
/// Cheap to clone; holds no open files.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    paths: PathScheme,
}

impl HistoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { paths: PathScheme::new(root) }
    }

    pub fn root(&self) -> &Path {
        self.paths.root()
    }

    pub fn paths(&self) -> &PathScheme {
        &self.paths
    }
}
