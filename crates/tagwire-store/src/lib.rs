//! Tagwire Store - side table from records to their tag sets.
//!
//! Records are owned by the host. The store only ever holds a `Weak`
//! reference to them, keyed by the address of their `Arc` allocation, so
//! tagging a record never changes its type and never extends its life.
//!
//! Entries are created on the first tag added to a record and never exist
//! for untagged records. Once a record is dropped its entry can no longer be
//! reached (the weak reference pins the allocation, so the address is never
//! handed to another record while the entry exists). Stale entries are
//! removed by [`TagSetStore::clear`], [`TagSetStore::purge`], or the
//! periodic sweep that runs as new entries are created.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod key;
mod store;

pub use key::RecordKey;
pub use store::{DEFAULT_SWEEP_INTERVAL, TagSetStore};
