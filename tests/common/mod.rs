//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use record_history::codec::FixedRecord;
use record_history::models::{MsgRecord, SubPayload};
use record_history::utils::file_name;
use tempfile::TempDir;

/// Builder for creating test history directory trees
pub struct HistoryDirBuilder {
    temp_dir: TempDir,
}

impl HistoryDirBuilder {
    /// Create a new builder with an empty history root
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    /// Get the path to the history root
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    fn category_dir(&self, category: &str) -> PathBuf {
        let dir = self.temp_dir.path().join(category);
        fs::create_dir_all(&dir).expect("Failed to create category dir");
        dir
    }

    /// Store a record under its canonical file name
    pub fn with_record(self, category: &str, record: &MsgRecord) -> Self {
        let name = file_name(category, record.header.receive_time);
        let path = self.category_dir(category).join(name);
        fs::write(path, record.encode()).expect("Failed to write record file");
        self
    }

    /// Store several records, one file each
    pub fn with_records(self, category: &str, records: &[MsgRecord]) -> Self {
        records.iter().fold(self, |builder, r| builder.with_record(category, r))
    }

    /// Store a file that is too short to decode, named as if received at `receive_time`
    pub fn with_truncated(self, category: &str, receive_time: u32) -> Self {
        let name = file_name(category, receive_time);
        let path = self.category_dir(category).join(name);
        fs::write(path, [0x01, 0x02, 0x03]).expect("Failed to write truncated file");
        self
    }

    /// Store raw bytes under an arbitrary file name
    pub fn with_raw_file(self, category: &str, name: &str, bytes: &[u8]) -> Self {
        let path = self.category_dir(category).join(name);
        fs::write(path, bytes).expect("Failed to write raw file");
        self
    }

    /// Build and return the temp directory (consumes self)
    pub fn build(self) -> TempDir {
        self.temp_dir
    }
}

impl Default for HistoryDirBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A well-formed message record received at `receive_time`
pub fn msg(receive_time: u32) -> MsgRecord {
    MsgRecord::new(receive_time, 0x01, SubPayload::new(0x0A, 0x0B, 0x0C))
}

/// Receive times one second apart starting at `base`
pub fn seconds_from(base: u32, count: u32) -> Vec<u32> {
    (0..count).map(|i| base + i).collect()
}

/// A "now"-ish timestamp safely inside any default retention window
pub fn recent_timestamp() -> u32 {
    let now = chrono::Utc::now().timestamp();
    u32::try_from(now - 3_600).expect("current time fits in u32")
}
