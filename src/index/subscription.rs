use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam::channel::{self, Receiver, Sender};
use tracing::{debug, error, info};

use super::LiveIndex;
use crate::models::HistoryRecord;

/// Producer side of a live ingestion stream
pub type LiveSender<R> = Sender<R>;

/// Unbounded channel carrying newly ingested records to a [`LiveIndex`]
pub fn live_channel<R>() -> (LiveSender<R>, Receiver<R>) {
    channel::unbounded()
}

/// Running drain worker started by [`LiveIndex::subscribe_and_merge`]
///
/// The worker stops once every [`LiveSender`] for its channel has been dropped.
#[derive(Debug)]
pub struct LiveSubscription {
    handle: JoinHandle<usize>,
}

impl LiveSubscription {
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the stream to close; returns how many live records were new to the index
    pub fn join(self) -> usize {
        self.handle.join().unwrap_or_else(|_| {
            error!("live merge worker panicked");
            0
        })
    }
}

impl<R: HistoryRecord> LiveIndex<R> {
    /// Drain `live` into this index on a dedicated thread
    ///
    /// Returns once the worker is running, so a bulk load started afterwards cannot
    /// race ahead of the subscription.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker thread cannot be spawned.
    pub fn subscribe_and_merge(self: &Arc<Self>, live: Receiver<R>) -> io::Result<LiveSubscription> {
        self.subscribe_with(live, |_| {})
    }

    /// Like [`LiveIndex::subscribe_and_merge`], calling `after_insert` for every received
    /// record once the index has seen it
    ///
    /// The index is updated first so a slow `after_insert` (such as a disk write)
    /// never delays the in-memory view.
    pub fn subscribe_with<F>(
        self: &Arc<Self>,
        live: Receiver<R>,
        mut after_insert: F,
    ) -> io::Result<LiveSubscription>
    where
        F: FnMut(&R) + Send + 'static,
    {
        let (ready_tx, ready_rx) = channel::bounded::<()>(1);
        let index = Arc::clone(self);

        let handle = thread::Builder::new().name("live-merge".to_string()).spawn(move || {
            let _ = ready_tx.send(());
            debug!(category = R::CATEGORY, "live merge worker started");

            let mut inserted = 0;
            for record in live.iter() {
                if index.insert_if_absent(record) {
                    inserted += 1;
                } else {
                    debug!(
                        receive_time = record.receive_time(),
                        "live record duplicates an existing second, ignored"
                    );
                }
                after_insert(&record);
            }

            info!(category = R::CATEGORY, inserted, "live stream closed");
            inserted
        })?;

        ready_rx
            .recv()
            .map_err(|_| io::Error::other("live merge worker exited before signalling readiness"))?;

        Ok(LiveSubscription { handle })
    }
}
