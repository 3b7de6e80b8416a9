//! Unified prelude for Tagwire.
//!
//! One import for the types an extension or host integration usually needs.
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use tagwire_prelude::*;
//!
//! let runtime = TagRuntime::<String>::new();
//! let id: TagId = runtime.reserve().unwrap();
//!
//! let record = Arc::new(String::from("event"));
//! runtime.add_tag(&record, id).unwrap();
//!
//! let mut writer = WireWriter::new();
//! runtime.on_record_serialized(&record, &mut writer);
//! assert_eq!(writer.as_bytes(), [0x01, 0x81, 0x01]);
//! ```
//!
//! # Per-Crate Preludes
//!
//! ```rust
//! use tagwire_codec::prelude::*;
//! use tagwire_core::prelude::*;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

// Re-export all crate preludes
pub use tagwire_codec::prelude::*;
pub use tagwire_core::prelude::*;
pub use tagwire_runtime::prelude::*;
pub use tagwire_telemetry::prelude::*;

// Crates without a prelude of their own
pub use tagwire_registry::TagRegistry;
pub use tagwire_store::{RecordKey, TagSetStore};
