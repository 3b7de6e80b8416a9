//! Environment variable fallbacks.
//!
//! Env vars are **fallback**, not override: they only apply to fields that
//! no config file set.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::merge::FileFields;

/// Prefix shared by every recognized variable.
pub const ENV_PREFIX: &str = "TAGWIRE_";

#[derive(Clone, Copy)]
enum FieldKind {
    Integer,
    String,
}

/// Mapping from environment variable name to config field path.
struct EnvMapping {
    var_name: &'static str,
    field_path: &'static str,
    kind: FieldKind,
}

const ENV_MAPPINGS: &[EnvMapping] = &[
    EnvMapping {
        var_name: "TAGWIRE_REGISTRY_LIMIT",
        field_path: "registry.limit",
        kind: FieldKind::Integer,
    },
    EnvMapping {
        var_name: "TAGWIRE_STORE_SWEEP_INTERVAL",
        field_path: "store.sweep_interval",
        kind: FieldKind::Integer,
    },
    EnvMapping {
        var_name: "TAGWIRE_CODEC_ON_MALFORMED",
        field_path: "codec.on_malformed",
        kind: FieldKind::String,
    },
    EnvMapping {
        var_name: "TAGWIRE_LOG_LEVEL",
        field_path: "logging.level",
        kind: FieldKind::String,
    },
    EnvMapping {
        var_name: "TAGWIRE_LOG_FORMAT",
        field_path: "logging.format",
        kind: FieldKind::String,
    },
];

/// Snapshot the `TAGWIRE_*` variables of the current process.
#[must_use]
pub fn collect_env_vars() -> HashMap<String, String> {
    std::env::vars()
        .filter(|(key, _)| key.starts_with(ENV_PREFIX))
        .collect()
}

/// Apply environment variable fallbacks to fields that no config file set.
///
/// Returns the number of env vars applied.
///
/// # Errors
///
/// Returns [`ConfigError::EnvError`] if a numeric variable does not parse.
pub fn apply_env_fallbacks<S: ::std::hash::BuildHasher>(
    merged: &mut toml::Value,
    file_fields: &FileFields,
    env_vars: &HashMap<String, String, S>,
) -> ConfigResult<usize> {
    let mut count: usize = 0;

    for mapping in ENV_MAPPINGS {
        if file_fields.contains(mapping.field_path) {
            continue;
        }
        let Some(raw) = env_vars.get(mapping.var_name) else {
            continue;
        };

        debug!(
            var = mapping.var_name,
            field = mapping.field_path,
            "applying env var fallback"
        );
        let value = coerce(mapping, raw)?;
        set_field(merged, mapping.field_path, value);
        count = count.saturating_add(1);
    }

    Ok(count)
}

fn coerce(mapping: &EnvMapping, raw: &str) -> ConfigResult<toml::Value> {
    match mapping.kind {
        FieldKind::String => Ok(toml::Value::String(raw.trim().to_owned())),
        FieldKind::Integer => raw
            .trim()
            .parse::<i64>()
            .map(toml::Value::Integer)
            .map_err(|e| ConfigError::EnvError {
                var_name: mapping.var_name.to_owned(),
                message: format!("expected an integer for {}: {e}", mapping.field_path),
            }),
    }
}

/// Set a dotted path in the TOML tree, creating intermediate tables.
fn set_field(root: &mut toml::Value, path: &str, value: toml::Value) {
    let Some((parents, leaf)) = path.rsplit_once('.') else {
        if let Some(table) = root.as_table_mut() {
            table.insert(path.to_owned(), value);
        }
        return;
    };

    let mut current = root;
    for segment in parents.split('.') {
        let Some(table) = current.as_table_mut() else {
            return;
        };
        current = table
            .entry(segment)
            .or_insert_with(|| toml::Value::Table(toml::map::Map::new()));
    }
    if let Some(table) = current.as_table_mut() {
        table.insert(leaf.to_owned(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn test_fallback_fills_unset_fields() {
        let mut merged: toml::Value = toml::from_str("[registry]\nlimit = 1152\n").unwrap();
        let vars = env(&[
            ("TAGWIRE_REGISTRY_LIMIT", "64"),
            ("TAGWIRE_LOG_LEVEL", "debug"),
        ]);

        let applied = apply_env_fallbacks(&mut merged, &FileFields::new(), &vars).unwrap();
        assert_eq!(applied, 2);
        assert_eq!(merged["registry"]["limit"].as_integer(), Some(64));
        assert_eq!(merged["logging"]["level"].as_str(), Some("debug"));
    }

    #[test]
    fn test_file_fields_win_over_env() {
        let mut merged: toml::Value = toml::from_str("[registry]\nlimit = 16\n").unwrap();
        let mut fields = FileFields::new();
        fields.insert("registry.limit".to_owned());
        let vars = env(&[("TAGWIRE_REGISTRY_LIMIT", "64")]);

        let applied = apply_env_fallbacks(&mut merged, &fields, &vars).unwrap();
        assert_eq!(applied, 0);
        assert_eq!(merged["registry"]["limit"].as_integer(), Some(16));
    }

    #[test]
    fn test_non_numeric_integer_is_env_error() {
        let mut merged = toml::Value::Table(toml::map::Map::new());
        let vars = env(&[("TAGWIRE_STORE_SWEEP_INTERVAL", "often")]);

        let err = apply_env_fallbacks(&mut merged, &FileFields::new(), &vars).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::EnvError { ref var_name, .. } if var_name == "TAGWIRE_STORE_SWEEP_INTERVAL"
        ));
    }
}
