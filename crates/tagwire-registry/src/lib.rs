//! Tagwire Registry - process-scoped allocator of tag identifiers.
//!
//! Extensions call [`TagRegistry::reserve`] once while they load to obtain
//! a stable [`TagId`](tagwire_core::TagId). Identifiers are handed out in
//! strict sequence, are never reused or reordered, and stop at a hard
//! ceiling no larger than the layout capacity.
//!
//! # Lifecycle
//!
//! A registry starts empty, grows by one per successful reservation, and is
//! never reset. Calling [`TagRegistry::seal`] ends the setup phase: later
//! reservations fail instead of racing with record processing.
//!
//! The registry is an explicit value (usually behind an `Arc`) rather than
//! a global, so tests and embedders can run several isolated registries.
//!
//! # Example
//!
//! ```rust
//! use tagwire_registry::TagRegistry;
//!
//! let registry = TagRegistry::new();
//! let urgent = registry.reserve_named("urgent").unwrap();
//! let audited = registry.reserve().unwrap();
//! registry.seal();
//!
//! assert_eq!(urgent.get(), 0);
//! assert_eq!(audited.get(), 1);
//! assert!(registry.is_valid(audited));
//! assert!(registry.reserve().is_err());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod registry;

pub use registry::TagRegistry;
