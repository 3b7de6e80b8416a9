//! Concurrent record → tag set table.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::{debug, trace};

use tagwire_core::{TagId, TagSet};

use crate::key::RecordKey;

/// Default number of newly tagged records between stale-entry sweeps.
pub const DEFAULT_SWEEP_INTERVAL: usize = 1024;

/// A tagged record and its tags.
struct StoreEntry<R: ?Sized> {
    record: Weak<R>,
    tags: TagSet,
}

impl<R: ?Sized> StoreEntry<R> {
    fn new(record: &Arc<R>, tags: TagSet) -> Self {
        Self {
            record: Arc::downgrade(record),
            tags,
        }
    }

    fn is_live(&self) -> bool {
        self.record.strong_count() > 0
    }
}

/// Association from record identity to its [`TagSet`].
///
/// Backed by a sharded [`DashMap`]: reads and inserts for different records
/// proceed concurrently, and writes to one record serialize on its shard.
pub struct TagSetStore<R: ?Sized> {
    entries: DashMap<RecordKey, StoreEntry<R>>,
    /// Sweep stale entries after this many new entries; 0 disables.
    sweep_interval: usize,
    /// Entries created since the store was built.
    created: AtomicUsize,
}

impl<R: ?Sized> TagSetStore<R> {
    /// Create an empty store with the default sweep interval.
    #[must_use]
    pub fn new() -> Self {
        Self::with_sweep_interval(DEFAULT_SWEEP_INTERVAL)
    }

    /// Create an empty store that sweeps stale entries every
    /// `sweep_interval` new entries. Zero disables the sweep.
    #[must_use]
    pub fn with_sweep_interval(sweep_interval: usize) -> Self {
        Self {
            entries: DashMap::new(),
            sweep_interval,
            created: AtomicUsize::new(0),
        }
    }

    /// Set a tag on a record, creating its entry on first use.
    ///
    /// The caller is responsible for validating `id` against its registry.
    /// Returns `true` if the tag was not already set.
    pub fn add_tag(&self, record: &Arc<R>, id: TagId) -> bool {
        let key = RecordKey::of(record);
        let (added, created) = match self.entries.entry(key) {
            Entry::Occupied(mut occupied) => (occupied.get_mut().tags.insert(id), false),
            Entry::Vacant(vacant) => {
                let mut tags = TagSet::new();
                tags.insert(id);
                vacant.insert(StoreEntry::new(record, tags));
                (true, true)
            },
        };
        trace!(record = %key, tag = %id, added, "Tagged record");
        if created {
            self.note_created();
        }
        added
    }

    /// Whether a record carries a tag. Untagged records cost one lookup.
    #[must_use]
    pub fn has_tag(&self, record: &Arc<R>, id: TagId) -> bool {
        self.entries
            .get(&RecordKey::of(record))
            .is_some_and(|entry| entry.tags.contains(id))
    }

    /// Clear one tag on a record. The entry is dropped once its set is
    /// empty. Returns `true` if the tag was set.
    pub fn remove_tag(&self, record: &Arc<R>, id: TagId) -> bool {
        let key = RecordKey::of(record);
        let removed = self
            .entries
            .get_mut(&key)
            .is_some_and(|mut entry| entry.tags.remove(id));
        if removed {
            self.entries.remove_if(&key, |_, entry| entry.tags.is_empty());
        }
        removed
    }

    /// Drop a record's association, returning its tags.
    pub fn clear(&self, record: &Arc<R>) -> Option<TagSet> {
        self.entries
            .remove(&RecordKey::of(record))
            .map(|(_, entry)| entry.tags)
    }

    /// Replace a record's tags, typically with a freshly decoded set.
    ///
    /// An empty set clears the association instead of creating an entry.
    /// Returns the previous tags, if any.
    pub fn install(&self, record: &Arc<R>, tags: TagSet) -> Option<TagSet> {
        if tags.is_empty() {
            return self.clear(record);
        }
        let previous = self
            .entries
            .insert(RecordKey::of(record), StoreEntry::new(record, tags))
            .map(|entry| entry.tags);
        if previous.is_none() {
            self.note_created();
        }
        previous
    }

    /// A record's tags in ascending order. Empty for untagged records.
    #[must_use]
    pub fn tags(&self, record: &Arc<R>) -> Vec<TagId> {
        self.with_tags(record, |tags| tags.iter().collect())
            .unwrap_or_default()
    }

    /// A copy of a record's tag set, if it has one.
    #[must_use]
    pub fn snapshot(&self, record: &Arc<R>) -> Option<TagSet> {
        self.with_tags(record, TagSet::clone)
    }

    /// Run `f` against a record's tag set without copying it.
    ///
    /// `f` runs under the shard's read lock and must not call back into the
    /// store for a record that may share the shard.
    pub fn with_tags<T>(&self, record: &Arc<R>, f: impl FnOnce(&TagSet) -> T) -> Option<T> {
        self.entries
            .get(&RecordKey::of(record))
            .map(|entry| f(&entry.tags))
    }

    /// Remove entries whose record has been dropped. Returns how many were
    /// removed.
    pub fn purge(&self) -> usize {
        let mut removed: usize = 0;
        self.entries.retain(|_, entry| {
            let live = entry.is_live();
            if !live {
                removed = removed.saturating_add(1);
            }
            live
        });
        if removed > 0 {
            debug!(removed, remaining = self.entries.len(), "Purged stale tag sets");
        }
        removed
    }

    /// Number of entries, stale ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sweep interval this store was built with.
    #[must_use]
    pub fn sweep_interval(&self) -> usize {
        self.sweep_interval
    }

    /// Count a new entry and sweep when the interval is reached. Must be
    /// called with no map guard held.
    fn note_created(&self) {
        let created = self.created.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
        if created.checked_rem(self.sweep_interval) == Some(0) {
            self.purge();
        }
    }
}

impl<R: ?Sized> Default for TagSetStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: ?Sized> fmt::Debug for TagSetStore<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagSetStore")
            .field("entries", &self.entries.len())
            .field("sweep_interval", &self.sweep_interval)
            .field("created", &self.created.load(Ordering::Relaxed))
            .finish()
    }
}
