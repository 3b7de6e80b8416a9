//! Prelude module - commonly used types for convenient import.
//!
//! Use `use tagwire_core::prelude::*;` to import all essential types.
//!
//! # Example
//!
//! ```rust
//! use tagwire_core::prelude::*;
//!
//! let mut set = TagSet::new();
//! let id = TagId::new(3).unwrap();
//! assert!(set.insert(id));
//! assert!(set.contains(id));
//! assert_eq!(CAPACITY, 1152);
//! ```

// Errors
pub use crate::{TagError, TagResult};

// Identifiers and sets
pub use crate::{Chunk, TagId, TagSet};

// Layout
pub use crate::{BITS_PER_SLOT, CAPACITY, SECTIONS, SLOTS_PER_SECTION, TAGS_PER_SECTION};
