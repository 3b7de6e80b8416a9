//! Bridge from `tagwire_config::TagwireConfig` to runtime types.

use std::sync::Arc;

use tagwire_config::{CodecSection, TagwireConfig};
use tagwire_registry::TagRegistry;
use tagwire_store::TagSetStore;
use tracing::info;

use crate::error::{RuntimeError, RuntimeResult};
use crate::policy::{MalformedPolicy, RuntimePolicy};
use crate::runtime::TagRuntime;

impl TryFrom<&CodecSection> for RuntimePolicy {
    type Error = RuntimeError;

    fn try_from(section: &CodecSection) -> RuntimeResult<Self> {
        let on_malformed = MalformedPolicy::from_name(&section.on_malformed).ok_or_else(|| {
            RuntimeError::InvalidConfig {
                field: "codec.on_malformed",
                value: section.on_malformed.clone(),
            }
        })?;
        Ok(Self {
            on_malformed,
            warn_unreserved: section.warn_unreserved,
        })
    }
}

impl<R: ?Sized> TagRuntime<R> {
    /// Build a runtime from a loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry limit exceeds the wire capacity or
    /// the malformed-block policy is unknown.
    pub fn from_config(config: &TagwireConfig) -> RuntimeResult<Self> {
        let registry = TagRegistry::with_limit(config.registry.limit)?;
        let policy = RuntimePolicy::try_from(&config.codec)?;
        info!(
            limit = config.registry.limit,
            sweep_interval = config.store.sweep_interval,
            on_malformed = ?policy.on_malformed,
            "Tag runtime configured"
        );
        Ok(Self::from_parts(
            Arc::new(registry),
            TagSetStore::with_sweep_interval(config.store.sweep_interval),
            policy,
        ))
    }
}
