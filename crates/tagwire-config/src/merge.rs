//! Deep merge of TOML value trees.

use std::collections::BTreeSet;

/// Dotted paths of the leaf fields a config file set explicitly.
pub type FileFields = BTreeSet<String>;

/// Recursively deep-merge `overlay` into `base`, recording every leaf path
/// the overlay sets.
///
/// - Tables merge recursively per-field.
/// - Scalars and arrays from the overlay **replace** the base value.
pub fn deep_merge(
    base: &mut toml::Value,
    overlay: &toml::Value,
    prefix: &str,
    fields: &mut FileFields,
) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };

                if let Some(base_val) = base_table.get_mut(key) {
                    deep_merge(base_val, overlay_val, &path, fields);
                } else {
                    base_table.insert(key.clone(), overlay_val.clone());
                    record_leaves(overlay_val, &path, fields);
                }
            }
        },
        (base, overlay) => {
            *base = overlay.clone();
            fields.insert(prefix.to_owned());
        },
    }
}

fn record_leaves(val: &toml::Value, prefix: &str, fields: &mut FileFields) {
    if let toml::Value::Table(table) = val {
        for (key, child) in table {
            record_leaves(child, &format!("{prefix}.{key}"), fields);
        }
    } else {
        fields.insert(prefix.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> toml::Value {
        toml::from_str(s).unwrap()
    }

    #[test]
    fn test_scalars_replace_and_tables_merge() {
        let mut base = parse(
            r#"
            [codec]
            on_malformed = "degrade"
            warn_unreserved = true
        "#,
        );
        let overlay = parse(
            r"
            [codec]
            warn_unreserved = false
        ",
        );

        let mut fields = FileFields::new();
        deep_merge(&mut base, &overlay, "", &mut fields);

        assert_eq!(base["codec"]["on_malformed"].as_str(), Some("degrade"));
        assert_eq!(base["codec"]["warn_unreserved"].as_bool(), Some(false));
        assert!(fields.contains("codec.warn_unreserved"));
        assert!(!fields.contains("codec.on_malformed"));
    }

    #[test]
    fn test_new_tables_record_all_leaves() {
        let mut base = parse("[registry]\nlimit = 1152\n");
        let overlay = parse("[store]\nsweep_interval = 0\n");

        let mut fields = FileFields::new();
        deep_merge(&mut base, &overlay, "", &mut fields);

        assert_eq!(base["store"]["sweep_interval"].as_integer(), Some(0));
        assert_eq!(fields.len(), 1);
        assert!(fields.contains("store.sweep_interval"));
    }

    #[test]
    fn test_arrays_replace() {
        let mut base = parse("[logging]\ndirectives = [\"a=debug\"]\n");
        let overlay = parse("[logging]\ndirectives = [\"b=warn\", \"c=info\"]\n");

        let mut fields = FileFields::new();
        deep_merge(&mut base, &overlay, "", &mut fields);

        let directives = base["logging"]["directives"].as_array().unwrap();
        assert_eq!(directives.len(), 2);
        assert_eq!(directives[0].as_str(), Some("b=warn"));
    }
}
