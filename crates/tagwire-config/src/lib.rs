#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
//! Layered configuration for Tagwire.
//!
//! # Usage
//!
//! ```rust
//! use tagwire_config::TagwireConfig;
//!
//! let config = TagwireConfig::from_toml_str("[registry]\nlimit = 64\n").unwrap();
//! assert_eq!(config.registry.limit, 64);
//! assert_eq!(config.codec.on_malformed, "degrade");
//! ```
//!
//! # Configuration Precedence
//!
//! From highest to lowest priority:
//!
//! 1. **Config file** passed to [`TagwireConfig::load`]
//! 2. **Environment variables** (`TAGWIRE_*`), fallback only
//! 3. **Embedded defaults** (`defaults.toml` compiled into the binary)
//!
//! # Design
//!
//! This crate has **no dependencies on other internal Tagwire crates**.
//! Conversion to runtime and telemetry types happens in those crates.

/// Environment variable fallback resolution.
pub mod env;
/// Configuration error types.
pub mod error;
/// Configuration file loading.
pub mod loader;
/// Deep merge of TOML trees.
pub mod merge;
/// Configuration struct definitions.
pub mod types;
/// Configuration validation rules.
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use types::*;

impl TagwireConfig {
    /// Load configuration from defaults, an optional file, and `TAGWIRE_*`
    /// environment variables.
    ///
    /// See [`loader::load`] for the full algorithm.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file is malformed or the final
    /// configuration fails validation.
    pub fn load(path: Option<&std::path::Path>) -> ConfigResult<Self> {
        loader::load(path)
    }

    /// Parse one TOML document layered over the embedded defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the document is malformed or fails
    /// validation.
    pub fn from_toml_str(document: &str) -> ConfigResult<Self> {
        loader::from_toml_str(document)
    }
}
