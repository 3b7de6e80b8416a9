//! Integration tests for peers whose registries disagree.
//!
//! Ids are positional, so two peers only agree on a tag's meaning when they
//! reserved in the same order. These tests pin down what the receiver sees
//! when they did not.

use tagwire_core::TagId;
use tagwire_runtime::{RuntimePolicy, TagRuntime};
use tagwire_test::{HostCodec, TestRecord, setup_test_logging, test_record};

fn runtime_with_labels(labels: &[&str]) -> (TagRuntime<TestRecord>, Vec<TagId>) {
    let runtime = TagRuntime::new();
    let ids = labels
        .iter()
        .map(|label| runtime.reserve_named(*label).unwrap())
        .collect();
    (runtime, ids)
}

#[test]
fn tags_beyond_receiver_reservations_are_invisible() {
    setup_test_logging("warn");
    let (sender, sender_ids) = runtime_with_labels(&["hostile", "flagged", "muted", "vip"]);
    let (receiver, _) = runtime_with_labels(&["hostile", "flagged"]);

    let record = test_record("chat", 1);
    sender.add_tag(&record, sender_ids[0]).unwrap();
    sender.add_tag(&record, sender_ids[3]).unwrap();

    let copy = HostCodec::new(&receiver)
        .deserialize(&HostCodec::new(&sender).serialize(&record))
        .unwrap();

    assert!(receiver.has_tag(&copy, sender_ids[0]));
    assert!(!receiver.has_tag(&copy, sender_ids[3]));
    assert_eq!(receiver.tags(&copy), [sender_ids[0]]);
}

#[test]
fn adding_an_unreserved_id_fails_loudly() {
    let (sender, sender_ids) = runtime_with_labels(&["a", "b", "c"]);
    let (receiver, _) = runtime_with_labels(&["a"]);
    let record = test_record("local", 2);

    assert!(sender.add_tag(&record, sender_ids[2]).is_ok());
    assert!(receiver.add_tag(&record, sender_ids[2]).is_err());
}

#[test]
fn different_reservation_order_swaps_meaning() {
    let (sender, sender_ids) = runtime_with_labels(&["hostile", "vip"]);
    let (receiver, receiver_ids) = runtime_with_labels(&["vip", "hostile"]);

    let record = test_record("spawn", 3);
    sender.add_tag(&record, sender_ids[0]).unwrap();

    let copy = HostCodec::new(&receiver)
        .deserialize(&HostCodec::new(&sender).serialize(&record))
        .unwrap();

    // The wire carries positions, not labels.
    assert_eq!(sender.describe(sender_ids[0]), "hostile");
    assert!(receiver.has_tag(&copy, receiver_ids[0]));
    assert_eq!(receiver.describe(receiver_ids[0]), "vip");
}

#[test]
fn quiet_policy_still_keeps_unreserved_tags() {
    let (sender, sender_ids) = runtime_with_labels(&["a", "b", "c", "d"]);
    let (receiver, _) = runtime_with_labels(&["a"]);
    let receiver = receiver.with_policy(RuntimePolicy::default().with_warn_unreserved(false));

    let record = test_record("relay", 4);
    sender.add_tag(&record, sender_ids[3]).unwrap();
    let bytes = HostCodec::new(&sender).serialize(&record);

    let copy = HostCodec::new(&receiver).deserialize(&bytes).unwrap();
    assert!(receiver.tags(&copy).is_empty());
    assert_eq!(receiver.store().len(), 1);
    assert_eq!(HostCodec::new(&receiver).serialize(&copy), bytes);
}
