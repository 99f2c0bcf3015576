//! Helpers over `serde_json::Value` shared by the shell and the page.

use serde_json::{Map, Value};

/// Name the page sees the key-mapping helper under.
pub const DEEP_MAP_KEYS: &str = "deepMapKeys";

/// Rebuilds every object in `value` with keys renamed by `rename`.
///
/// `rename` receives the already-mapped child value and the original key.
/// Arrays are walked so objects inside them are mapped too; scalars are
/// returned as they are.
pub fn deep_map_keys<F>(value: &Value, rename: F) -> Value
where
    F: Fn(&Value, &str) -> String,
{
    map_value(value, &rename)
}

fn map_value<F>(value: &Value, rename: &F) -> Value
where
    F: Fn(&Value, &str) -> String,
{
    match value {
        Value::Object(object) => {
            let mut mapped = Map::with_capacity(object.len());
            for (key, child) in object {
                let child = map_value(child, rename);
                mapped.insert(rename(&child, key), child);
            }
            Value::Object(mapped)
        }
        Value::Array(items) => {
            Value::Array(items.iter().map(|item| map_value(item, rename)).collect())
        }
        scalar => scalar.clone(),
    }
}

/// `value_type` → `valueType`; keys without underscores are unchanged.
pub fn snake_to_camel(key: &str) -> String {
    let mut camel = String::with_capacity(key.len());
    let mut upper_next = false;
    for ch in key.chars() {
        if ch == '_' && !camel.is_empty() {
            upper_next = true;
        } else if upper_next {
            camel.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            camel.push(ch);
        }
    }
    camel
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn keys_are_renamed_at_every_depth() {
        let source = json!({
            "user_settings": [{"value_type": "string", "nested_value": {"inner_key": 1}}],
            "plain": true
        });

        let mapped = deep_map_keys(&source, |_, key| snake_to_camel(key));

        assert_eq!(
            mapped,
            json!({
                "userSettings": [{"valueType": "string", "nestedValue": {"innerKey": 1}}],
                "plain": true
            })
        );
    }

    #[test]
    fn rename_sees_the_mapped_child_value() {
        let source = json!({"count": 3, "label": "x"});
        let mapped = deep_map_keys(&source, |value, key| {
            if value.is_number() {
                format!("{key}_n")
            } else {
                key.to_string()
            }
        });
        assert_eq!(mapped, json!({"count_n": 3, "label": "x"}));
    }

    #[test]
    fn scalars_and_leading_underscores_pass_through() {
        assert_eq!(deep_map_keys(&json!(5), |_, key| key.to_uppercase()), json!(5));
        assert_eq!(snake_to_camel("_private"), "_private");
        assert_eq!(snake_to_camel("zoom_level"), "zoomLevel");
        assert_eq!(snake_to_camel("theme"), "theme");
    }
}
