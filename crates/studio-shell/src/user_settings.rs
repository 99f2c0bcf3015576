use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::platform_info::OsFamily;

pub const THEME_KEY: &str = "theme";
pub const MENU_STYLE_KEY: &str = "menuStyle";
pub const ZOOM_LEVEL_KEY: &str = "zoomLevel";

pub const NATIVE_MENU_STYLE: &str = "native";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    String,
    Int,
    Float,
    Boolean,
    Object,
    Array,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSetting {
    pub key: String,
    pub value: Value,
    pub value_type: ValueType,
}

impl UserSetting {
    pub fn new(key: impl Into<String>, value: Value, value_type: ValueType) -> Self {
        Self {
            key: key.into(),
            value,
            value_type,
        }
    }

    /// String form of the value; non-string JSON values use their JSON text.
    pub fn value_string(&self) -> String {
        match &self.value {
            Value::String(text) => text.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }

    /// Numeric form of the value, `0` when absent or not a finite number.
    pub fn value_number(&self) -> f64 {
        let parsed = match &self.value {
            Value::Number(number) => number.as_f64(),
            Value::String(text) if text.trim().is_empty() => Some(0.0),
            Value::String(text) => text.trim().parse::<f64>().ok(),
            Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
            _ => None,
        };
        parsed.filter(|value| value.is_finite()).unwrap_or(0.0)
    }
}

pub fn default_settings(os: OsFamily) -> Vec<UserSetting> {
    let menu_style = if os == OsFamily::Macos {
        NATIVE_MENU_STYLE
    } else {
        "client"
    };
    vec![
        UserSetting::new(THEME_KEY, Value::from("system"), ValueType::String),
        UserSetting::new(MENU_STYLE_KEY, Value::from(menu_style), ValueType::String),
        UserSetting::new(ZOOM_LEVEL_KEY, Value::from(0), ValueType::Float),
    ]
}

/// User settings keyed by setting name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupedUserSettings(BTreeMap<String, UserSetting>);

impl GroupedUserSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&UserSetting> {
        self.0.get(key)
    }

    pub fn insert(&mut self, setting: UserSetting) -> Option<UserSetting> {
        self.0.insert(setting.key.clone(), setting)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &UserSetting> {
        self.0.values()
    }

    pub fn theme(&self) -> Option<String> {
        self.get(THEME_KEY).map(UserSetting::value_string)
    }

    pub fn menu_style(&self) -> Option<String> {
        self.get(MENU_STYLE_KEY).map(UserSetting::value_string)
    }

    pub fn uses_native_menu(&self) -> bool {
        self.menu_style().as_deref() == Some(NATIVE_MENU_STYLE)
    }

    pub fn zoom_level(&self) -> f64 {
        self.get(ZOOM_LEVEL_KEY)
            .map(UserSetting::value_number)
            .unwrap_or(0.0)
    }
}

impl FromIterator<UserSetting> for GroupedUserSettings {
    fn from_iter<T: IntoIterator<Item = UserSetting>>(iter: T) -> Self {
        let mut grouped = GroupedUserSettings::new();
        for setting in iter {
            grouped.insert(setting);
        }
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn zoom(value: Value) -> f64 {
        GroupedUserSettings::from_iter([UserSetting::new(
            ZOOM_LEVEL_KEY,
            value,
            ValueType::Float,
        )])
        .zoom_level()
    }

    #[test]
    fn zoom_level_defaults_to_zero_for_missing_or_invalid_values() {
        assert_eq!(GroupedUserSettings::new().zoom_level(), 0.0);
        assert_eq!(zoom(json!("abc")), 0.0);
        assert_eq!(zoom(json!(null)), 0.0);
        assert_eq!(zoom(json!({"nested": 1})), 0.0);
        assert_eq!(zoom(json!("")), 0.0);
    }

    #[test]
    fn zoom_level_accepts_numbers_and_numeric_strings() {
        assert_eq!(zoom(json!(2)), 2.0);
        assert_eq!(zoom(json!(" -1.5 ")), -1.5);
        assert_eq!(zoom(json!(true)), 1.0);
    }

    #[test]
    fn theme_uses_json_text_for_non_string_values() {
        let settings = GroupedUserSettings::from_iter([UserSetting::new(
            THEME_KEY,
            json!(["dark"]),
            ValueType::Array,
        )]);
        assert_eq!(settings.theme().as_deref(), Some("[\"dark\"]"));
    }

    #[test]
    fn default_menu_style_is_native_only_on_macos() {
        let mac = GroupedUserSettings::from_iter(default_settings(OsFamily::Macos));
        let linux = GroupedUserSettings::from_iter(default_settings(OsFamily::Linux));
        assert!(mac.uses_native_menu());
        assert!(!linux.uses_native_menu());
        assert_eq!(linux.theme().as_deref(), Some("system"));
    }

    #[test]
    fn serializes_with_camel_case_value_type() {
        let setting = UserSetting::new(MENU_STYLE_KEY, json!("native"), ValueType::String);
        let encoded = serde_json::to_value(&setting).expect("serialize setting");
        assert_eq!(
            encoded,
            json!({"key": "menuStyle", "value": "native", "valueType": "string"})
        );
    }
}
