//! Test fixtures.

use std::sync::Arc;

use tagwire_core::{TagId, TagSet};
use tagwire_runtime::TagRuntime;

/// A small host record: an event kind and a sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestRecord {
    /// Event kind.
    pub kind: String,
    /// Position in the host's stream.
    pub sequence: u64,
}

impl TestRecord {
    /// Create a record.
    #[must_use]
    pub fn new(kind: impl Into<String>, sequence: u64) -> Self {
        Self {
            kind: kind.into(),
            sequence,
        }
    }
}

/// Create a shared test record.
#[must_use]
pub fn test_record(kind: &str, sequence: u64) -> Arc<TestRecord> {
    Arc::new(TestRecord::new(kind, sequence))
}

/// Create a runtime with `count` tags already reserved.
///
/// # Panics
///
/// Panics if `count` exceeds the tag capacity.
#[must_use]
pub fn test_runtime(count: usize) -> (TagRuntime<TestRecord>, Vec<TagId>) {
    let runtime = TagRuntime::new();
    let ids = (0..count)
        .map(|n| {
            runtime
                .reserve_named(format!("test-{n}"))
                .expect("Failed to reserve test tag")
        })
        .collect();
    (runtime, ids)
}

/// Build a tag set from raw ids. Out-of-range ids are skipped.
#[must_use]
pub fn test_tag_set(ids: &[u16]) -> TagSet {
    ids.iter().copied().filter_map(TagId::new).collect()
}
