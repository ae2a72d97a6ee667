//! Process-level wiring of store, live stream and index for one record kind
//!
//! [`HistoryService::start`] performs startup in a fixed order:
//!
//! 1. subscribe the live stream (each live record goes to the index, then to disk)
//! 2. purge files past the retention window
//! 3. bulk-load the category from disk into the index
//!
//! Step 1 completing before step 3 starts is what guarantees that records ingested
//! during the scan are neither lost nor duplicated.

use std::io;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone};
use crossbeam::channel::Receiver;
use tracing::info;

use crate::index::{LiveIndex, LiveSubscription};
use crate::models::HistoryRecord;
use crate::store::HistoryStore;

/// Startup behaviour of a [`HistoryService`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceOptions {
    /// Files older than this many days are deleted at startup; 0 keeps everything
    pub retention_days: u32,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self { retention_days: 30 }
    }
}

/// Owns the history of one record kind for the lifetime of the process
pub struct HistoryService<R: HistoryRecord> {
    store: HistoryStore,
    index: Arc<LiveIndex<R>>,
    subscription: LiveSubscription,
    loaded: usize,
}

impl<R: HistoryRecord> HistoryService<R> {
    /// Subscribe to `live`, apply retention and load the stored history
    ///
    /// # Errors
    ///
    /// Returns an error only if the live worker thread cannot be started. Storage
    /// failures are logged and leave the index with fewer historical records.
    pub fn start(store: HistoryStore, live: Receiver<R>, options: ServiceOptions) -> io::Result<Self> {
        let index = Arc::new(LiveIndex::new());

        let writer = store.clone();
        let subscription = index.subscribe_with(live, move |record: &R| {
            writer.persist(R::CATEGORY, record);
        })?;

        if options.retention_days > 0 {
            store.purge_older_than(R::CATEGORY, options.retention_days);
        }

        let loaded = index.merge(store.load_all::<R>(R::CATEGORY));
        info!(category = R::CATEGORY, loaded, total = index.len(), "history service started");

        Ok(Self { store, index, subscription, loaded })
    }

    pub fn index(&self) -> &Arc<LiveIndex<R>> {
        &self.index
    }

    pub fn store(&self) -> &HistoryStore {
        &self.store
    }

    /// Number of stored records that made it into the index during startup
    pub fn loaded_from_disk(&self) -> usize {
        self.loaded
    }

    pub fn range_query<Tz: TimeZone>(&self, start: &DateTime<Tz>, end: &DateTime<Tz>) -> Vec<R> {
        self.index.range_query(start, end)
    }

    pub fn available_dates(&self) -> Vec<NaiveDate> {
        self.store.available_dates(R::CATEGORY)
    }

    /// Wait for the live stream to close and the worker to finish
    ///
    /// Every sender for the live channel must be dropped first, otherwise this blocks.
    /// Returns the number of live records that were new to the index.
    pub fn shutdown(self) -> usize {
        let inserted = self.subscription.join();
        info!(category = R::CATEGORY, inserted, "history service stopped");
        inserted
    }
}
