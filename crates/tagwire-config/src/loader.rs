//! Layered configuration loading.
//!
//! Implements the `TagwireConfig::load()` algorithm:
//! 1. Parse embedded `defaults.toml` → base
//! 2. Merge the optional config file
//! 3. Apply `TAGWIRE_*` env var fallbacks for fields the file did not set
//! 4. Deserialize merged tree → `TagwireConfig`
//! 5. Validate

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};

use crate::env::{apply_env_fallbacks, collect_env_vars};
use crate::error::{ConfigError, ConfigResult};
use crate::merge::{FileFields, deep_merge};
use crate::types::TagwireConfig;
use crate::validate;

/// Embedded default configuration.
const DEFAULTS_TOML: &str = include_str!("defaults.toml");

/// Maximum allowed config file size (1 MiB).
const MAX_CONFIG_FILE_SIZE: u64 = 1_048_576;

/// Load configuration from defaults, an optional file, and the process
/// environment.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file is unreadable or malformed, an env
/// var does not parse, or the merged configuration fails validation.
pub fn load(path: Option<&Path>) -> ConfigResult<TagwireConfig> {
    load_with_env(path, &collect_env_vars())
}

/// Same as [`load`] with an explicit environment snapshot.
///
/// # Errors
///
/// See [`load`].
pub fn load_with_env<S: ::std::hash::BuildHasher>(
    path: Option<&Path>,
    env_vars: &HashMap<String, String, S>,
) -> ConfigResult<TagwireConfig> {
    let mut merged = parse_defaults()?;
    let mut file_fields = FileFields::new();

    if let Some(path) = path {
        let overlay = read_file(path)?;
        deep_merge(&mut merged, &overlay, "", &mut file_fields);
        info!(path = %path.display(), fields = file_fields.len(), "loaded config file");
    }

    let env_count = apply_env_fallbacks(&mut merged, &file_fields, env_vars)?;
    if env_count > 0 {
        debug!(count = env_count, "applied environment variable fallbacks");
    }

    finish(merged, "<merged config>")
}

/// Parse a single TOML document layered over the embedded defaults.
///
/// The environment is not consulted.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the document is malformed or fails
/// validation.
pub fn from_toml_str(document: &str) -> ConfigResult<TagwireConfig> {
    let mut merged = parse_defaults()?;
    let overlay: toml::Value = toml::from_str(document).map_err(|e| ConfigError::ParseError {
        path: "<string>".to_owned(),
        source: e,
    })?;
    deep_merge(&mut merged, &overlay, "", &mut FileFields::new());
    finish(merged, "<string>")
}

fn parse_defaults() -> ConfigResult<toml::Value> {
    toml::from_str(DEFAULTS_TOML).map_err(|e| ConfigError::ParseError {
        path: "<embedded defaults>".to_owned(),
        source: e,
    })
}

fn finish(merged: toml::Value, origin: &str) -> ConfigResult<TagwireConfig> {
    let config: TagwireConfig =
        merged
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::ParseError {
                path: origin.to_owned(),
                source: e,
            })?;
    validate::validate(&config)?;
    Ok(config)
}

/// Read and parse a config file, refusing anything over the size limit.
fn read_file(path: &Path) -> ConfigResult<toml::Value> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    // Check size after reading to avoid TOCTOU between stat and read.
    if content.len() as u64 > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::ValidationError {
            field: path.display().to_string(),
            message: format!(
                "config file is {} bytes, exceeding the {} byte limit",
                content.len(),
                MAX_CONFIG_FILE_SIZE
            ),
        });
    }

    toml::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.display().to_string(),
        source: e,
    })
}
