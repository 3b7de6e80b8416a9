//! Integration tests for concurrent use of one runtime.

#![allow(clippy::arithmetic_side_effects)]

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use tagwire_core::TagId;
use tagwire_runtime::TagRuntime;
use tagwire_test::{HostCodec, TestRecord, test_record, test_runtime};

#[test]
fn concurrent_reservation_hands_out_each_id_once() {
    let runtime = TagRuntime::<TestRecord>::new();

    let ids: Vec<TagId> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    let mut mine = Vec::new();
                    while let Ok(id) = runtime.reserve() {
                        mine.push(id);
                    }
                    mine
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect()
    });

    assert_eq!(ids.len(), 1152);
    let unique: HashSet<TagId> = ids.iter().copied().collect();
    assert_eq!(unique.len(), 1152);
    assert_eq!(runtime.registry().remaining(), 0);
}

#[test]
fn many_threads_tag_shared_records() {
    let (runtime, ids) = test_runtime(64);
    let records: Vec<Arc<TestRecord>> = (0..32u64).map(|n| test_record("shared", n)).collect();

    thread::scope(|scope| {
        for worker in 0..8usize {
            let runtime = &runtime;
            let records = &records;
            let ids = &ids;
            scope.spawn(move || {
                for (n, record) in records.iter().enumerate() {
                    // Each worker owns eight ids, so the final sets are known.
                    let id = ids[worker * 8 + n % 8];
                    runtime.add_tag(record, id).unwrap();
                    assert!(runtime.has_tag(record, id));
                }
            });
        }
    });

    for (n, record) in records.iter().enumerate() {
        let expected: Vec<TagId> = (0..8).map(|worker| ids[worker * 8 + n % 8]).collect();
        assert_eq!(runtime.tags(record), expected);
    }
    assert_eq!(runtime.store().len(), records.len());
}

#[test]
fn serialization_runs_alongside_tagging() {
    let (runtime, ids) = test_runtime(16);
    let record = test_record("busy", 0);

    thread::scope(|scope| {
        scope.spawn(|| {
            for id in &ids {
                runtime.add_tag(&record, *id).unwrap();
            }
        });
        scope.spawn(|| {
            let host = HostCodec::new(&runtime);
            for _ in 0..100 {
                // Any snapshot must decode cleanly.
                let bytes = host.serialize(&record);
                let (peer, _) = test_runtime(16);
                assert!(HostCodec::new(&peer).deserialize(&bytes).is_ok());
            }
        });
    });

    assert_eq!(runtime.tags(&record), ids);
}

#[test]
fn dropped_records_are_purged() {
    let (runtime, ids) = test_runtime(1);
    thread::scope(|scope| {
        for n in 0..4u64 {
            let runtime = &runtime;
            let id = ids[0];
            scope.spawn(move || {
                for m in 0..25u64 {
                    let record = test_record("short-lived", n * 100 + m);
                    runtime.add_tag(&record, id).unwrap();
                }
            });
        }
    });

    assert_eq!(runtime.store().len(), 100);
    assert_eq!(runtime.purge(), 100);
    assert!(runtime.store().is_empty());
}
