//! Record writes (temp file + exclusive link) and single-file reads

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, error, warn};

use super::{HistoryStore, StoreError};
use crate::codec::FixedRecord;
use crate::models::HistoryRecord;
use crate::utils::file_name;

static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

impl HistoryStore {
    /// Write `record` to its own file under `category`
    ///
    /// A record whose file already exists (same category, same second) is not
    /// written again: the first write for a given second wins, matching the live
    /// index.
    ///
    /// # Errors
    ///
    /// - [`StoreError::PathResolution`] if the category directory cannot be created
    /// - [`StoreError::AlreadyExists`] if a file for this second is already stored
    /// - [`StoreError::Io`] if the write or link fails
    pub fn try_persist<R: HistoryRecord>(
        &self,
        category: &str,
        record: &R,
    ) -> Result<PathBuf, StoreError> {
        let receive_time = record.receive_time();
        let dir = self.paths.category_dir(category).map_err(StoreError::path_resolution(category))?;

        let name = file_name(category, receive_time);
        let path = dir.join(&name);
        if path.exists() {
            return Err(StoreError::AlreadyExists { path });
        }

        // Hidden temp name never matches the category's search pattern, and is unique
        // per call so concurrent writers of the same second never share one
        let seq = TEMP_SEQ.fetch_add(1, Ordering::Relaxed);
        let temp = dir.join(format!(".{}.{}.{}.tmp", name, process::id(), seq));
        fs::write(&temp, record.encode()).map_err(StoreError::io(&temp))?;

        // Linking fails if the target exists, so a racing writer cannot replace it
        let linked = fs::hard_link(&temp, &path);
        let _ = fs::remove_file(&temp);
        match linked {
            Ok(()) => Ok(path),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Err(StoreError::AlreadyExists { path }),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    /// Write `record` to disk, logging instead of failing
    ///
    /// Returns the written path, or `None` if the write was dropped. A dropped write
    /// means the record only lives in memory until the process exits.
    pub fn persist<R: HistoryRecord>(&self, category: &str, record: &R) -> Option<PathBuf> {
        match self.try_persist(category, record) {
            Ok(path) => {
                debug!(path = %path.display(), "persisted record");
                Some(path)
            }
            Err(StoreError::AlreadyExists { path }) => {
                warn!(
                    path = %path.display(),
                    receive_time = record.receive_time(),
                    "record for this second already stored, dropping write"
                );
                None
            }
            Err(e) => {
                error!(category, receive_time = record.receive_time(), "failed to persist record: {}", e);
                None
            }
        }
    }
}

/// Read and decode one history file
///
/// # Errors
///
/// Returns [`StoreError::Io`] if the file cannot be read (including when it was
/// deleted after being listed) and [`StoreError::Decode`] if it is shorter than
/// the record size.
pub fn read_record<R: FixedRecord>(path: &Path) -> Result<R, StoreError> {
    let bytes = fs::read(path).map_err(StoreError::io(path))?;
    R::decode(&bytes).map_err(|source| StoreError::Decode { path: path.to_path_buf(), source })
}
