//! Record identity.

use std::fmt;
use std::sync::Arc;

/// Identity of a record: the address of its `Arc` allocation.
///
/// The address stays unique for as long as any strong or weak reference to
/// the allocation exists, and the store keeps a weak reference next to every
/// key it holds.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordKey(usize);

impl RecordKey {
    /// Identity of the record behind `record`.
    #[must_use]
    pub fn of<R: ?Sized>(record: &Arc<R>) -> Self {
        Self(Arc::as_ptr(record).cast::<()>().addr())
    }
}

impl fmt::Debug for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordKey({:#x})", self.0)
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_identity() {
        let a = Arc::new(5u32);
        let b = Arc::clone(&a);
        assert_eq!(RecordKey::of(&a), RecordKey::of(&b));
    }

    #[test]
    fn test_equal_values_have_distinct_identity() {
        let a = Arc::new(String::from("same"));
        let b = Arc::new(String::from("same"));
        assert_ne!(RecordKey::of(&a), RecordKey::of(&b));
    }
}
