//! Tagwire Telemetry - Logging setup for processes that embed Tagwire.
//!
//! The library crates only emit `tracing` events. This crate installs the
//! global subscriber that formats and routes them.
//!
//! # Example
//!
//! ```rust,no_run
//! use tagwire_telemetry::{LogConfig, LogFormat, setup_logging};
//!
//! # fn main() -> Result<(), tagwire_telemetry::TelemetryError> {
//! let config = LogConfig::new("info")
//!     .with_format(LogFormat::Compact)
//!     .with_directive("tagwire_codec=trace");
//!
//! setup_logging(&config)?;
//! tracing::info!("logging ready");
//! # Ok(())
//! # }
//! ```
//!
//! With the `config` feature, a [`LogConfig`] can be built from the
//! `[logging]` section of a `tagwire_config::TagwireConfig`.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod error;
mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{
    FileLogConfig, FileRotation, LogConfig, LogFormat, LogTarget, setup_default_logging,
    setup_logging,
};
