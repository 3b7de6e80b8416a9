//! Tagwire Core - Foundation types for runtime-registered record tags.
//!
//! This crate provides:
//! - The fixed bit layout shared by every peer on the wire
//! - [`TagId`], the sequential identifier handed out to extensions
//! - [`TagSet`], a two-level sparse bitmap of active tags for one record
//! - Error types for reservation and validation
//!
//! Nothing here allocates identifiers or touches records; see
//! `tagwire-registry` and `tagwire-store` for that.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod error;
pub mod layout;
pub mod tag;
pub mod tag_set;

pub use error::{TagError, TagResult};
pub use layout::{BITS_PER_SLOT, CAPACITY, SECTIONS, SLOTS_PER_SECTION, TAGS_PER_SECTION};
pub use tag::TagId;
pub use tag_set::{Chunk, TagSet};
