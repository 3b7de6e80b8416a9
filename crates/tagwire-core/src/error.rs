//! Error types for tag reservation and validation.

use thiserror::Error;

use crate::tag::TagId;

/// Errors raised when reserving or using tag identifiers.
///
/// All of these are programmer errors on the extension side and are meant
/// to fail fast rather than be recovered from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    /// Every identifier up to the registry limit has been handed out.
    #[error("tag capacity exceeded: all {limit} tag ids are reserved")]
    CapacityExceeded {
        /// The registry's reservation ceiling.
        limit: usize,
    },

    /// The identifier was never reserved in this registry.
    #[error("invalid tag id {id}: only {reserved} tag ids are reserved")]
    InvalidTag {
        /// The rejected identifier.
        id: TagId,
        /// Number of identifiers reserved when the check ran.
        reserved: usize,
    },

    /// A raw integer lies outside the identifier space.
    #[error("tag id {raw} is outside the identifier space (capacity {capacity})")]
    OutOfRange {
        /// The rejected raw value.
        raw: u16,
        /// Total identifier capacity.
        capacity: u16,
    },

    /// Reservation was attempted after the setup phase ended.
    #[error("tag registry is sealed after {reserved} reservations")]
    RegistrySealed {
        /// Number of identifiers reserved before sealing.
        reserved: usize,
    },

    /// A registry was configured with a ceiling above the layout capacity.
    #[error("registry limit {requested} exceeds tag capacity {capacity}")]
    LimitTooLarge {
        /// The requested limit.
        requested: usize,
        /// Total identifier capacity.
        capacity: u16,
    },
}

/// Result type for tag operations.
pub type TagResult<T> = Result<T, TagError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TagError::CapacityExceeded { limit: 1152 };
        assert_eq!(
            err.to_string(),
            "tag capacity exceeded: all 1152 tag ids are reserved"
        );

        let err = TagError::InvalidTag {
            id: TagId::new(7).unwrap(),
            reserved: 3,
        };
        assert_eq!(
            err.to_string(),
            "invalid tag id tag#7: only 3 tag ids are reserved"
        );
    }

    #[test]
    fn test_result_type() {
        fn sealed() -> TagResult<TagId> {
            Err(TagError::RegistrySealed { reserved: 2 })
        }

        assert_eq!(
            sealed().unwrap_err().to_string(),
            "tag registry is sealed after 2 reservations"
        );
    }
}
