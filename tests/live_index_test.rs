/// Concurrency tests for the live index
///
/// These tests run bulk merges and a live subscription at the same time and
/// verify that nothing is lost or duplicated
mod common;

use std::sync::Arc;
use std::thread;

use chrono::{TimeZone, Utc};
use common::{msg, seconds_from};
use record_history::index::{LiveIndex, live_channel};
use record_history::models::{MsgRecord, SubPayload};

#[test]
fn test_concurrent_bulk_merge_and_live_stream() {
    const BULK: u32 = 2_000;
    const LIVE: u32 = 500;

    let index = Arc::new(LiveIndex::<MsgRecord>::new());
    let (tx, rx) = live_channel();
    let subscription = index.subscribe_and_merge(rx).unwrap();

    let producer = thread::spawn(move || {
        for ts in seconds_from(1_000_000 + BULK, LIVE) {
            tx.send(msg(ts)).unwrap();
        }
    });

    let bulk: Vec<MsgRecord> = seconds_from(1_000_000, BULK).into_iter().map(msg).collect();
    let merged = index.merge(bulk);

    producer.join().unwrap();
    let live_inserted = subscription.join();

    assert_eq!(merged, BULK as usize);
    assert_eq!(live_inserted, LIVE as usize);
    assert_eq!(index.len(), (BULK + LIVE) as usize);
}

#[test]
fn test_overlapping_sources_keep_first_record() {
    let index = Arc::new(LiveIndex::<MsgRecord>::new());
    let first = MsgRecord::new(500, 0x01, SubPayload::new(0x0A, 0x0A, 0x0A));
    let second = MsgRecord::new(500, 0x03, SubPayload::new(0x0C, 0x0C, 0x0C));

    assert!(index.insert_if_absent(first));

    let (tx, rx) = live_channel();
    let subscription = index.subscribe_and_merge(rx).unwrap();
    tx.send(second).unwrap();
    drop(tx);

    assert_eq!(subscription.join(), 0);
    assert_eq!(index.merge([second]), 0);
    assert_eq!(index.get(500), Some(first));
}

#[test]
fn test_many_threads_racing_on_same_seconds() {
    let index = Arc::new(LiveIndex::<MsgRecord>::new());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let index = Arc::clone(&index);
            thread::spawn(move || {
                seconds_from(10_000, 250).into_iter().filter(|ts| index.insert_if_absent(msg(*ts))).count()
            })
        })
        .collect();

    let total: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(total, 250, "Each second is inserted exactly once across all threads");
    assert_eq!(index.len(), 250);
}

#[test]
fn test_range_query_inclusive_bounds() {
    let index = LiveIndex::<MsgRecord>::new();
    index.merge([msg(300), msg(100), msg(200)]);

    let at = |secs: i64| Utc.timestamp_opt(secs, 0).unwrap();

    assert_eq!(index.range_query(&at(100), &at(200)), vec![msg(100), msg(200)]);
    assert_eq!(index.range_query(&at(100), &at(300)), vec![msg(100), msg(200), msg(300)]);
    assert_eq!(index.range_query(&at(150), &at(150)), Vec::<MsgRecord>::new());
    assert!(index.range_query(&at(300), &at(100)).is_empty(), "Inverted range is empty");
}
