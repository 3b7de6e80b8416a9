//! Configuration types for Tagwire.
//!
//! These types have no dependency on the other Tagwire crates. Values that
//! map onto domain types (the malformed-block policy, log format) are kept
//! as validated strings and converted at the boundary.

use serde::{Deserialize, Serialize};

/// Number of distinct tag ids the wire layout can carry.
pub const REGISTRY_CAPACITY: usize = 1152;

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagwireConfig {
    /// Tag reservation limits.
    pub registry: RegistrySection,
    /// Record tag store housekeeping.
    pub store: StoreSection,
    /// Trailing tag block handling.
    pub codec: CodecSection,
    /// Logging level, format, and per-crate directives.
    pub logging: LoggingSection,
}

// ---------------------------------------------------------------------------
// RegistrySection
// ---------------------------------------------------------------------------

/// Tag reservation limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrySection {
    /// Maximum number of tags that may be reserved, `1..=1152`.
    pub limit: usize,
}

impl Default for RegistrySection {
    fn default() -> Self {
        Self {
            limit: REGISTRY_CAPACITY,
        }
    }
}

// ---------------------------------------------------------------------------
// StoreSection
// ---------------------------------------------------------------------------

/// Record tag store housekeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    /// Purge entries of dropped records every this many new entries.
    /// `0` disables the periodic sweep.
    pub sweep_interval: usize,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            sweep_interval: 1024,
        }
    }
}

// ---------------------------------------------------------------------------
// CodecSection
// ---------------------------------------------------------------------------

/// Trailing tag block handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecSection {
    /// `"degrade"` keeps the record and drops its tags when the block is
    /// malformed; `"reject"` fails the deserialization.
    pub on_malformed: String,
    /// Log decoded tags that were never reserved in this process.
    pub warn_unreserved: bool,
}

impl Default for CodecSection {
    fn default() -> Self {
        Self {
            on_malformed: "degrade".to_owned(),
            warn_unreserved: true,
        }
    }
}

// ---------------------------------------------------------------------------
// LoggingSection
// ---------------------------------------------------------------------------

/// Logging and tracing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Global log level filter (`"trace"`, `"debug"`, `"info"`, `"warn"`,
    /// `"error"`).
    pub level: String,
    /// Output format: `"pretty"` (human-friendly), `"compact"` (one-line),
    /// `"json"` (structured), or `"full"` (verbose).
    pub format: String,
    /// Per-crate tracing directives (e.g. `["tagwire_codec=trace"]`).
    pub directives: Vec<String>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: "compact".to_owned(),
            directives: Vec::new(),
        }
    }
}
