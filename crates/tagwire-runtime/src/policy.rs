//! Decode-side policy.

use serde::{Deserialize, Serialize};

/// What to do when a record's trailing tag block is malformed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Log a warning and hand back the record with no tags.
    #[default]
    Degrade,
    /// Fail the deserialization with the codec error.
    Reject,
}

impl MalformedPolicy {
    /// Parse the lowercase name used in configuration files.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "degrade" => Some(Self::Degrade),
            "reject" => Some(Self::Reject),
            _ => None,
        }
    }
}

/// Knobs applied when consuming tag blocks from a peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimePolicy {
    /// Handling of malformed blocks.
    pub on_malformed: MalformedPolicy,
    /// Warn about decoded tags that were never reserved in this process.
    pub warn_unreserved: bool,
}

impl Default for RuntimePolicy {
    fn default() -> Self {
        Self {
            on_malformed: MalformedPolicy::Degrade,
            warn_unreserved: true,
        }
    }
}

impl RuntimePolicy {
    /// Use `on_malformed` for malformed blocks.
    #[must_use]
    pub fn with_on_malformed(mut self, on_malformed: MalformedPolicy) -> Self {
        self.on_malformed = on_malformed;
        self
    }

    /// Enable or disable warnings for unreserved decoded tags.
    #[must_use]
    pub fn with_warn_unreserved(mut self, warn_unreserved: bool) -> Self {
        self.warn_unreserved = warn_unreserved;
        self
    }
}
