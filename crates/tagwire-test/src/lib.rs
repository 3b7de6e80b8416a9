//! Tagwire Test - Shared test utilities for the Tagwire crates.
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! tagwire-test.workspace = true
//! ```
//!
//! ```rust
//! use tagwire_test::{HostCodec, test_record, test_runtime};
//!
//! let (runtime, ids) = test_runtime(3);
//! let record = test_record("spawn", 1);
//! runtime.add_tag(&record, ids[2]).unwrap();
//!
//! let host = HostCodec::new(&runtime);
//! let copy = host.deserialize(&host.serialize(&record)).unwrap();
//! assert_eq!(*copy, *record);
//! assert!(runtime.has_tag(&copy, ids[2]));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod prelude;

pub mod fixtures;
pub mod harness;
pub mod mocks;

pub use fixtures::*;
pub use harness::*;
pub use mocks::*;
