//! Prelude module - commonly used types for convenient import.
//!
//! Use `use tagwire_runtime::prelude::*;` to import all essential types.

// Errors
pub use crate::{RuntimeError, RuntimeResult};

// Runtime
pub use crate::{MalformedPolicy, RuntimePolicy, TagRuntime};
