//! Tagwire Runtime - The handle extensions and host serializers talk to.
//!
//! [`TagRuntime`] owns a [`TagRegistry`](tagwire_registry::TagRegistry), a
//! [`TagSetStore`](tagwire_store::TagSetStore) and a [`RuntimePolicy`].
//! There is no global state; the host builds one runtime per process and
//! hands references to its extensions.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use tagwire_runtime::TagRuntime;
//!
//! struct Event;
//!
//! let runtime = TagRuntime::<Event>::new();
//! let hostile = runtime.reserve_named("hostile").unwrap();
//! let flagged = runtime.reserve_named("flagged").unwrap();
//! let _unused = runtime.reserve().unwrap();
//! runtime.seal();
//!
//! let event = Arc::new(Event);
//! runtime.add_tag(&event, hostile).unwrap();
//!
//! // The host writes its own fields first, then the tag block.
//! let mut wire = Vec::new();
//! runtime.on_record_serialized(&event, &mut wire);
//! assert_eq!(wire, [0x01, 0x81, 0x01]);
//!
//! // On the receiving side the block follows the host's fields.
//! let received = runtime
//!     .on_record_deserialized(Arc::new(Event), &mut &wire[..])
//!     .unwrap();
//! assert!(runtime.has_tag(&received, hostile));
//! assert!(!runtime.has_tag(&received, flagged));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod config_bridge;
mod error;
mod policy;
mod runtime;

pub use error::{RuntimeError, RuntimeResult};
pub use policy::{MalformedPolicy, RuntimePolicy};
pub use runtime::TagRuntime;
