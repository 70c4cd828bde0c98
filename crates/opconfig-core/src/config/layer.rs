//! Flattened configuration layers

use std::collections::BTreeMap;

use serde_json::Value;

use super::traits::{ConfigError, ConfigResult};

/// Separator between path segments of a flattened key
pub const KEY_DELIMITER: &str = ":";

/// A named set of key/value settings
///
/// Nested JSON is flattened into `parent:child` keys, array elements into
/// `parent:0`, `parent:1`, ...; scalars keep their textual form and `null`
/// becomes an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigLayer {
    source: String,
    values: BTreeMap<String, String>,
}

impl ConfigLayer {
    /// Create an empty layer
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            values: BTreeMap::new(),
        }
    }

    /// Build a layer from key/value pairs
    pub fn from_pairs<K, V>(source: impl Into<String>, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut layer = Self::new(source);
        for (k, v) in pairs {
            layer.insert(k, v);
        }
        layer
    }

    /// Flatten a JSON document into a layer. The root must be an object.
    pub fn from_json(source: impl Into<String>, json: &Value) -> ConfigResult<Self> {
        let source = source.into();
        let root = match json {
            Value::Object(map) => map,
            other => {
                return Err(ConfigError::NotAnObject {
                    source_name: source,
                    found: json_kind(other),
                })
            }
        };

        let mut layer = Self::new(source);
        for (key, value) in root {
            layer.flatten(key.clone(), value);
        }
        Ok(layer)
    }

    /// Parse JSON text and flatten it
    pub fn from_json_str(source: impl Into<String>, text: &str) -> ConfigResult<Self> {
        let json: Value = serde_json::from_str(text)?;
        Self::from_json(source, &json)
    }

    /// Snapshot the process environment. Non-UTF-8 variables are skipped.
    pub fn from_env() -> Self {
        let vars = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)));
        Self::from_pairs("env", vars)
    }

    fn flatten(&mut self, path: String, value: &Value) {
        match value {
            Value::Object(map) if !map.is_empty() => {
                for (key, child) in map {
                    self.flatten(format!("{path}{KEY_DELIMITER}{key}"), child);
                }
            }
            Value::Array(items) if !items.is_empty() => {
                for (index, child) in items.iter().enumerate() {
                    self.flatten(format!("{path}{KEY_DELIMITER}{index}"), child);
                }
            }
            Value::Object(_) | Value::Array(_) | Value::Null => {
                self.values.insert(path, String::new());
            }
            Value::String(s) => {
                self.values.insert(path, s.clone());
            }
            Value::Bool(b) => {
                self.values.insert(path, b.to_string());
            }
            Value::Number(n) => {
                self.values.insert(path, n.to_string());
            }
        }
    }

    /// Where this layer came from (file, item title, ...)
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Insert or replace a key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate keys and values in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_nested_objects() {
        let layer = ConfigLayer::from_json(
            "test",
            &json!({
                "Foo": "bar",
                "Database": {"Host": "db.local", "Port": 5432, "Tls": true},
            }),
        )
        .unwrap();

        assert_eq!(layer.source(), "test");
        assert_eq!(layer.get("Foo"), Some("bar"));
        assert_eq!(layer.get("Database:Host"), Some("db.local"));
        assert_eq!(layer.get("Database:Port"), Some("5432"));
        assert_eq!(layer.get("Database:Tls"), Some("true"));
        assert!(!layer.contains_key("Database"));
    }

    #[test]
    fn test_flatten_arrays_by_index() {
        let layer = ConfigLayer::from_json(
            "test",
            &json!({"Hosts": ["a", "b"], "Rules": [{"Name": "x"}]}),
        )
        .unwrap();

        assert_eq!(layer.get("Hosts:0"), Some("a"));
        assert_eq!(layer.get("Hosts:1"), Some("b"));
        assert_eq!(layer.get("Rules:0:Name"), Some("x"));
    }

    #[test]
    fn test_null_and_empty_containers() {
        let layer = ConfigLayer::from_json(
            "test",
            &json!({"Nothing": null, "EmptyObj": {}, "EmptyArr": []}),
        )
        .unwrap();

        assert_eq!(layer.get("Nothing"), Some(""));
        assert_eq!(layer.get("EmptyObj"), Some(""));
        assert_eq!(layer.get("EmptyArr"), Some(""));
        assert_eq!(layer.len(), 3);
    }

    #[test]
    fn test_root_must_be_object() {
        let err = ConfigLayer::from_json("notes", &json!([1, 2])).unwrap_err();
        assert!(matches!(err, ConfigError::NotAnObject { found: "an array", .. }));
        assert!(err.to_string().contains("notes"));
    }

    #[test]
    fn test_from_json_str_invalid() {
        let err = ConfigLayer::from_json_str("x", "{broken").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_from_pairs_and_iter() {
        let layer = ConfigLayer::from_pairs("pairs", [("b", "2"), ("a", "1")]);
        let collected: Vec<_> = layer.iter().collect();
        assert_eq!(collected, vec![("a", "1"), ("b", "2")]);
        assert!(!layer.is_empty());
    }

    #[test]
    fn test_from_env() {
        std::env::set_var("OPCONFIG_LAYER_TEST_VAR", "present");
        let layer = ConfigLayer::from_env();
        assert_eq!(layer.source(), "env");
        assert_eq!(layer.get("OPCONFIG_LAYER_TEST_VAR"), Some("present"));
        std::env::remove_var("OPCONFIG_LAYER_TEST_VAR");
    }
}
