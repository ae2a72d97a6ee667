//! Directory listing, ordered bulk load, date discovery and retention

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Local, LocalResult, NaiveDate, TimeZone};
use rayon::prelude::*;
use tracing::{debug, error, info, warn};

use super::persistence::read_record;
use super::{HistoryStore, StoreError};
use crate::models::HistoryRecord;
use crate::utils::{matches_category, parse_timestamp, validate_category};

/// A history file found while listing a category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub path: PathBuf,
    /// Parsed from the file name, or the file's creation time when the name does not parse
    pub timestamp: DateTime<Local>,
    /// Whether `timestamp` came from the file name
    pub named: bool,
}

impl HistoryStore {
    /// List a category's files, oldest first
    ///
    /// Only files matching the category's search pattern are returned. Ordering uses
    /// the timestamp in the file name, falling back to creation time (then
    /// modification time, then now) for names that do not parse. A missing category
    /// directory yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the category name is invalid or the directory exists but
    /// cannot be read. Unreadable individual entries are logged and skipped.
    pub fn list_files(&self, category: &str) -> Result<Vec<StoredFile>, StoreError> {
        validate_category(category).map_err(StoreError::path_resolution(category))?;
        let dir = self.paths.category_path(category);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&dir).map_err(StoreError::io(&dir))?;
        let mut files = Vec::new();

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(dir = %dir.display(), "skipping unreadable directory entry: {}", e);
                    continue;
                }
            };
            let path = entry.path();

            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !matches_category(category, name) {
                continue;
            }

            // Symlinks and directories are never written by the store
            match entry.file_type() {
                Ok(file_type) if file_type.is_file() => {}
                Ok(_) => {
                    debug!(path = %path.display(), "skipping non-regular file");
                    continue;
                }
                Err(e) => {
                    warn!(path = %path.display(), "skipping file with unreadable type: {}", e);
                    continue;
                }
            }

            let (timestamp, named) = match parse_timestamp(name) {
                Some(ts) => (ts, true),
                None => (fallback_timestamp(&path), false),
            };
            files.push(StoredFile { path, timestamp, named });
        }

        files.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.path.cmp(&b.path)));
        Ok(files)
    }

    /// Load every record of a category, ordered by receive time
    ///
    /// # Errors
    ///
    /// Fails only when the category cannot be listed at all. Files that cannot be
    /// read or decoded are logged and left out of the result.
    pub fn try_load_all<R: HistoryRecord>(&self, category: &str) -> Result<Vec<R>, StoreError> {
        let files = self.list_files(category)?;
        Ok(decode_files(category, &files))
    }

    /// Load every record of a category, ordered by receive time
    ///
    /// Never fails: an unlistable category is logged and yields an empty list.
    pub fn load_all<R: HistoryRecord>(&self, category: &str) -> Vec<R> {
        self.try_load_all(category).unwrap_or_else(|e| {
            error!(category, "failed to load history: {}", e);
            Vec::new()
        })
    }

    /// Load the records of a category received within `[start, end]`
    ///
    /// Files are selected by the timestamp in their name before anything is opened;
    /// decoded records are then filtered again by their own receive time.
    pub fn load_range<R: HistoryRecord, Tz: TimeZone>(
        &self,
        category: &str,
        start: &DateTime<Tz>,
        end: &DateTime<Tz>,
    ) -> Vec<R> {
        let (lo, hi) = (start.timestamp(), end.timestamp());
        let files = match self.list_files(category) {
            Ok(files) => files,
            Err(e) => {
                error!(category, "failed to list history: {}", e);
                return Vec::new();
            }
        };

        // Only named files can be excluded up front; fallback times are not reliable,
        // and names from a repeated DST hour may parse one fold early
        let candidates: Vec<StoredFile> = files
            .into_iter()
            .filter(|f| {
                !f.named
                    || is_ambiguous_local(&f.timestamp)
                    || (lo..=hi).contains(&f.timestamp.timestamp())
            })
            .collect();

        decode_files::<R>(category, &candidates)
            .into_iter()
            .filter(|r| (lo..=hi).contains(&i64::from(r.receive_time())))
            .collect()
    }

    /// Distinct local calendar dates that have at least one file, newest first
    pub fn available_dates(&self, category: &str) -> Vec<NaiveDate> {
        let files = match self.list_files(category) {
            Ok(files) => files,
            Err(e) => {
                error!(category, "failed to list history dates: {}", e);
                return Vec::new();
            }
        };

        let dates: BTreeSet<NaiveDate> = files.iter().map(|f| f.timestamp.date_naive()).collect();
        dates.into_iter().rev().collect()
    }

    /// Delete files of a category older than `days` days
    ///
    /// Age is taken from the file name, or creation time for names that do not parse.
    /// Files that vanish before deletion are ignored; other failures are logged.
    /// Returns the number of files removed.
    pub fn purge_older_than(&self, category: &str, days: u32) -> usize {
        let Some(cutoff) = Local::now().checked_sub_signed(Duration::days(i64::from(days))) else {
            debug!(category, days, "retention window predates every representable time, nothing to purge");
            return 0;
        };
        let files = match self.list_files(category) {
            Ok(files) => files,
            Err(e) => {
                error!(category, "failed to list history for purge: {}", e);
                return 0;
            }
        };

        let mut removed = 0;
        for file in files.iter().filter(|f| f.timestamp < cutoff) {
            match fs::remove_file(&file.path) {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => {
                    warn!(path = %file.path.display(), "failed to delete expired history file: {}", e)
                }
            }
        }

        if removed > 0 {
            info!(category, removed, days, "purged expired history files");
        }
        removed
    }
}

/// Whether the wall-clock time of `ts` occurs twice in the local zone
fn is_ambiguous_local(ts: &DateTime<Local>) -> bool {
    matches!(Local.from_local_datetime(&ts.naive_local()), LocalResult::Ambiguous(..))
}

/// Read and decode files in parallel, skipping failures, then order by receive time
fn decode_files<R: HistoryRecord>(category: &str, files: &[StoredFile]) -> Vec<R> {
    let results: Vec<Result<R, StoreError>> =
        files.par_iter().map(|f| read_record::<R>(&f.path)).collect();

    let mut records = Vec::with_capacity(results.len());
    let mut skipped = 0;
    for result in results {
        match result {
            Ok(record) => records.push(record),
            Err(e) => {
                skipped += 1;
                warn!(category, "skipping history file: {}", e);
            }
        }
    }

    // File order and payload time can disagree; the payload wins
    records.sort_by_key(|r| r.receive_time());

    if skipped > 0 {
        info!(category, loaded = records.len(), skipped, "loaded history with skipped files");
    } else {
        debug!(category, loaded = records.len(), "loaded history");
    }
    records
}

fn fallback_timestamp(path: &Path) -> DateTime<Local> {
    fs::metadata(path)
        .and_then(|m| m.created().or_else(|_| m.modified()))
        .map(DateTime::<Local>::from)
        .unwrap_or_else(|e| {
            debug!(path = %path.display(), "no file time available, using now: {}", e);
            Local::now()
        })
}
