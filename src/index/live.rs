use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, TimeZone};

use crate::models::HistoryRecord;

/// Deduplicated, receive-time keyed set of records
///
/// All access goes through one mutex over the whole map. Ordering is not stored;
/// queries sort a fresh copy of the matching records every time.
#[derive(Debug)]
pub struct LiveIndex<R> {
    entries: Mutex<HashMap<u32, R>>,
}

impl<R: HistoryRecord> LiveIndex<R> {
    pub fn new() -> Self {
        Self { entries: Mutex::new(HashMap::new()) }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<u32, R>> {
        // Entries are plain Copy values, so a panicking holder cannot leave one half-written
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert `record` unless one with the same receive time is already present
    ///
    /// Returns `true` if inserted. An existing record is never overwritten.
    pub fn insert_if_absent(&self, record: R) -> bool {
        match self.lock().entry(record.receive_time()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(record);
                true
            }
        }
    }

    /// Insert many records through the same gate, returning how many were new
    pub fn merge<I>(&self, records: I) -> usize
    where
        I: IntoIterator<Item = R>,
    {
        let mut entries = self.lock();
        let mut inserted = 0;
        for record in records {
            if let Entry::Vacant(slot) = entries.entry(record.receive_time()) {
                slot.insert(record);
                inserted += 1;
            }
        }
        inserted
    }

    /// Records received within `[start, end]` (both inclusive), oldest first
    ///
    /// Receive times are compared as instants, so bounds in any time zone work.
    pub fn range_query<Tz: TimeZone>(&self, start: &DateTime<Tz>, end: &DateTime<Tz>) -> Vec<R> {
        self.range_query_secs(start.timestamp(), end.timestamp())
    }

    /// [`LiveIndex::range_query`] with bounds in epoch seconds
    pub fn range_query_secs(&self, start: i64, end: i64) -> Vec<R> {
        let mut matched: Vec<R> = self
            .lock()
            .values()
            .filter(|r| (start..=end).contains(&i64::from(r.receive_time())))
            .copied()
            .collect();
        matched.sort_by_key(|r| r.receive_time());
        matched
    }

    /// Every record, oldest first
    pub fn snapshot(&self) -> Vec<R> {
        let mut all: Vec<R> = self.lock().values().copied().collect();
        all.sort_by_key(|r| r.receive_time());
        all
    }

    pub fn get(&self, receive_time: u32) -> Option<R> {
        self.lock().get(&receive_time).copied()
    }

    /// Most recently received record
    pub fn latest(&self) -> Option<R> {
        self.lock().values().max_by_key(|r| r.receive_time()).copied()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl<R: HistoryRecord> Default for LiveIndex<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Local, Utc};

    use super::*;
    use crate::models::{MsgRecord, SubPayload};

    fn rec(ts: u32, flag: u8) -> MsgRecord {
        MsgRecord::new(ts, flag, SubPayload::new(0x0A, 0x0B, 0x0C))
    }

    #[test]
    fn test_starts_empty() {
        let index = LiveIndex::<MsgRecord>::new();
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
        assert!(index.latest().is_none());
    }

    #[test]
    fn test_insert_if_absent_first_wins() {
        let index = LiveIndex::new();
        assert!(index.insert_if_absent(rec(100, 0x01)));
        assert!(!index.insert_if_absent(rec(100, 0x02)));

        assert_eq!(index.len(), 1);
        assert_eq!(index.get(100), Some(rec(100, 0x01)));
    }

    #[test]
    fn test_merge_counts_only_new_records() {
        let index = LiveIndex::new();
        index.insert_if_absent(rec(200, 0x03));

        let inserted = index.merge(vec![rec(100, 0x01), rec(200, 0x01), rec(300, 0x01)]);
        assert_eq!(inserted, 2);
        assert_eq!(index.get(200), Some(rec(200, 0x03)));
    }

    #[test]
    fn test_range_query_inclusive_and_sorted() {
        let index = LiveIndex::new();
        index.merge(vec![rec(300, 1), rec(100, 1), rec(200, 1)]);

        let times: Vec<u32> =
            index.range_query_secs(100, 200).iter().map(|r| r.header.receive_time).collect();
        assert_eq!(times, vec![100, 200]);
    }

    #[test]
    fn test_range_query_with_datetimes() {
        let index = LiveIndex::new();
        index.merge(vec![rec(1_700_000_300, 1), rec(1_700_000_100, 1), rec(1_700_000_200, 1)]);

        let start = Local.timestamp_opt(1_700_000_100, 0).single().unwrap();
        let end = Local.timestamp_opt(1_700_000_200, 0).single().unwrap();
        let local: Vec<u32> =
            index.range_query(&start, &end).iter().map(|r| r.header.receive_time).collect();
        assert_eq!(local, vec![1_700_000_100, 1_700_000_200]);

        // Same instants expressed in UTC select the same records
        let start_utc = start.with_timezone(&Utc);
        let end_utc = end.with_timezone(&Utc);
        assert_eq!(index.range_query(&start_utc, &end_utc).len(), 2);
    }

    #[test]
    fn test_range_query_empty_and_inverted() {
        let index = LiveIndex::new();
        index.merge(vec![rec(100, 1), rec(200, 1)]);

        assert!(index.range_query_secs(201, 300).is_empty());
        assert!(index.range_query_secs(200, 100).is_empty());
    }

    #[test]
    fn test_snapshot_and_latest() {
        let index = LiveIndex::new();
        index.merge(vec![rec(30, 1), rec(10, 1), rec(20, 1)]);

        let times: Vec<u32> = index.snapshot().iter().map(|r| r.header.receive_time).collect();
        assert_eq!(times, vec![10, 20, 30]);
        assert_eq!(index.latest().map(|r| r.header.receive_time), Some(30));
    }
}
