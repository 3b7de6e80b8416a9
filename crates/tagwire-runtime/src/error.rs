//! Runtime error types.

use tagwire_codec::CodecError;
use tagwire_core::TagError;
use thiserror::Error;

/// Errors surfaced by [`TagRuntime`](crate::TagRuntime).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// Reservation or validation failure.
    #[error("Tag error: {0}")]
    Tag(#[from] TagError),

    /// The trailing tag block could not be decoded and the policy rejects it.
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// A configuration value the runtime cannot use.
    #[error("Invalid configuration for '{field}': {value}")]
    InvalidConfig {
        /// Dotted config path.
        field: &'static str,
        /// The rejected value.
        value: String,
    },
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
