//! Prelude module - commonly used test helpers.
//!
//! Use `use tagwire_test::prelude::*;` in test modules.

// Fixtures
pub use crate::{TestRecord, test_record, test_runtime, test_tag_set};

// Mocks
pub use crate::HostCodec;

// Harness
pub use crate::{setup_test_logging, setup_test_logging_default, test_file};
