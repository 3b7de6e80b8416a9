//! Post-merge configuration validation.

use crate::error::{ConfigError, ConfigResult};
use crate::types::{REGISTRY_CAPACITY, TagwireConfig};

/// Validate a fully merged and deserialized configuration.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate(config: &TagwireConfig) -> ConfigResult<()> {
    validate_registry(config)?;
    validate_codec(config)?;
    validate_logging(config)?;
    Ok(())
}

fn validate_registry(config: &TagwireConfig) -> ConfigResult<()> {
    let limit = config.registry.limit;
    if limit == 0 || limit > REGISTRY_CAPACITY {
        return Err(ConfigError::ValidationError {
            field: "registry.limit".to_owned(),
            message: format!("limit {limit} must be between 1 and {REGISTRY_CAPACITY}"),
        });
    }
    Ok(())
}

fn validate_codec(config: &TagwireConfig) -> ConfigResult<()> {
    let valid = ["degrade", "reject"];
    if !valid.contains(&config.codec.on_malformed.as_str()) {
        return Err(ConfigError::ValidationError {
            field: "codec.on_malformed".to_owned(),
            message: format!(
                "unsupported policy '{}'; expected one of: {}",
                config.codec.on_malformed,
                valid.join(", ")
            ),
        });
    }
    Ok(())
}

fn validate_logging(config: &TagwireConfig) -> ConfigResult<()> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.logging.level.as_str()) {
        return Err(ConfigError::ValidationError {
            field: "logging.level".to_owned(),
            message: format!(
                "unsupported log level '{}'; expected one of: {}",
                config.logging.level,
                valid_levels.join(", ")
            ),
        });
    }

    let valid_formats = ["pretty", "compact", "json", "full"];
    if !valid_formats.contains(&config.logging.format.as_str()) {
        return Err(ConfigError::ValidationError {
            field: "logging.format".to_owned(),
            message: format!(
                "unsupported log format '{}'; expected one of: {}",
                config.logging.format,
                valid_formats.join(", ")
            ),
        });
    }

    if config.logging.directives.iter().any(|d| d.trim().is_empty()) {
        return Err(ConfigError::ValidationError {
            field: "logging.directives".to_owned(),
            message: "directives must not be empty".to_owned(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&TagwireConfig::default()).is_ok());
    }

    #[test]
    fn test_registry_limit_bounds() {
        let mut config = TagwireConfig::default();
        config.registry.limit = 0;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::ValidationError { field, .. }) if field == "registry.limit"
        ));

        config.registry.limit = REGISTRY_CAPACITY + 1;
        assert!(validate(&config).is_err());

        config.registry.limit = 1;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_invalid_malformed_policy() {
        let mut config = TagwireConfig::default();
        config.codec.on_malformed = "ignore".to_owned();
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("codec.on_malformed"));
    }

    #[test]
    fn test_invalid_log_level_and_format() {
        let mut config = TagwireConfig::default();
        config.logging.level = "verbose".to_owned();
        assert!(validate(&config).is_err());

        let mut config = TagwireConfig::default();
        config.logging.format = "xml".to_owned();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_blank_directive_rejected() {
        let mut config = TagwireConfig::default();
        config.logging.directives = vec!["tagwire_codec=trace".to_owned(), "  ".to_owned()];
        assert!(validate(&config).is_err());
    }
}
