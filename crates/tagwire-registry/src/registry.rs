//! Sequential tag id allocation.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use dashmap::DashMap;
use tracing::{debug, info, warn};

use tagwire_core::{CAPACITY, TagError, TagId, TagResult};

/// Append-only allocator of [`TagId`]s.
///
/// The reserved count only ever grows, one step per successful
/// [`reserve`](Self::reserve). Concurrent reservations go through a single
/// compare-and-swap on that count, so they can never duplicate an id or
/// overshoot the limit.
#[derive(Debug)]
pub struct TagRegistry {
    /// Number of ids handed out so far.
    reserved: AtomicUsize,
    /// Reservation ceiling, at most [`CAPACITY`].
    limit: usize,
    /// Set once the setup phase is over.
    sealed: AtomicBool,
    /// Diagnostic labels for ids reserved through `reserve_named`.
    labels: DashMap<TagId, String>,
}

impl TagRegistry {
    /// Create an empty registry that can hand out the full capacity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            reserved: AtomicUsize::new(0),
            limit: usize::from(CAPACITY),
            sealed: AtomicBool::new(false),
            labels: DashMap::new(),
        }
    }

    /// Create an empty registry with a lower reservation ceiling.
    ///
    /// # Errors
    ///
    /// Returns [`TagError::LimitTooLarge`] if `limit` exceeds [`CAPACITY`].
    pub fn with_limit(limit: usize) -> TagResult<Self> {
        if limit > usize::from(CAPACITY) {
            return Err(TagError::LimitTooLarge {
                requested: limit,
                capacity: CAPACITY,
            });
        }
        Ok(Self {
            limit,
            ..Self::new()
        })
    }

    /// Reserve the next tag id.
    ///
    /// Reservation is permanent for the lifetime of the registry.
    ///
    /// # Errors
    ///
    /// - [`TagError::RegistrySealed`] after [`seal`](Self::seal).
    /// - [`TagError::CapacityExceeded`] once `limit` ids are reserved.
    pub fn reserve(&self) -> TagResult<TagId> {
        let id = self.allocate()?;
        debug!(tag = %id, reserved = id.index().saturating_add(1), "Reserved tag");
        Ok(id)
    }

    /// Reserve the next tag id and attach a label to it for log output.
    ///
    /// The label is informational only. It plays no part in id assignment
    /// and is never sent to peers.
    ///
    /// # Errors
    ///
    /// Same as [`reserve`](Self::reserve).
    pub fn reserve_named(&self, label: impl Into<String>) -> TagResult<TagId> {
        let label = label.into();
        let id = self.allocate().inspect_err(|e| {
            warn!(label = %label, error = %e, "Tag reservation failed");
        })?;
        debug!(tag = %id, label = %label, "Reserved named tag");
        self.labels.insert(id, label);
        Ok(id)
    }

    fn allocate(&self) -> TagResult<TagId> {
        if self.sealed.load(Ordering::Acquire) {
            let reserved = self.reserved_count();
            warn!(reserved, "Tag reservation attempted on sealed registry");
            return Err(TagError::RegistrySealed { reserved });
        }

        let limit = self.limit;
        let previous = self
            .reserved
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |count| {
                count.checked_add(1).filter(|next| *next <= limit)
            })
            .map_err(|_| {
                warn!(limit, "Tag capacity exhausted");
                TagError::CapacityExceeded { limit }
            })?;

        // previous < limit <= CAPACITY, so both conversions succeed.
        u16::try_from(previous)
            .ok()
            .and_then(TagId::new)
            .ok_or(TagError::CapacityExceeded { limit })
    }

    /// Whether `id` has been reserved in this registry.
    #[must_use]
    pub fn is_valid(&self, id: TagId) -> bool {
        id.index() < self.reserved_count()
    }

    /// Check that `id` has been reserved in this registry.
    ///
    /// # Errors
    ///
    /// Returns [`TagError::InvalidTag`] if it has not.
    pub fn validate(&self, id: TagId) -> TagResult<()> {
        let reserved = self.reserved_count();
        if id.index() < reserved {
            Ok(())
        } else {
            Err(TagError::InvalidTag { id, reserved })
        }
    }

    /// End the setup phase. Returns the number of ids reserved.
    ///
    /// Sealing is one-way; already reserved ids stay valid.
    pub fn seal(&self) -> usize {
        let reserved = self.reserved_count();
        if !self.sealed.swap(true, Ordering::AcqRel) {
            info!(reserved, limit = self.limit, "Tag registry sealed");
        }
        reserved
    }

    /// Whether [`seal`](Self::seal) has been called.
    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.sealed.load(Ordering::Acquire)
    }

    /// Number of ids reserved so far.
    #[must_use]
    pub fn reserved_count(&self) -> usize {
        self.reserved.load(Ordering::Acquire)
    }

    /// Reservation ceiling.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Number of ids still available.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.limit.saturating_sub(self.reserved_count())
    }

    /// Label attached by [`reserve_named`](Self::reserve_named), if any.
    #[must_use]
    pub fn label(&self, id: TagId) -> Option<String> {
        self.labels.get(&id).map(|label| label.value().clone())
    }

    /// Every reserved id, ascending.
    pub fn reserved(&self) -> impl Iterator<Item = TagId> {
        let count = u16::try_from(self.reserved_count()).unwrap_or(CAPACITY);
        (0..count).filter_map(TagId::new)
    }
}

impl Default for TagRegistry {
    fn default() -> Self {
        Self::new()
    }
}
