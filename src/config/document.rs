//! In-memory configuration document
//!
//! A thin wrapper over an insertion-ordered YAML mapping. Keys are free-form;
//! the only convention enforced here is numeric coercion for size and count
//! parameters.

use serde::{Deserialize, Serialize};
use serde_yaml_ng::{Mapping, Value};

use crate::packer::coerce_parameter;

/// Ordered mapping of settings describing one VM template
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigDocument(Mapping);

impl ConfigDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Insert or replace a value, keeping the original position of an
    /// existing key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(Value::String(key.into()), value.into())
    }

    /// Store raw user input for a template parameter, coercing sizes and
    /// counts to integers where possible.
    pub fn set_parameter(&mut self, name: &str, raw: &str) -> Option<Value> {
        let value = coerce_parameter(name, raw);
        self.insert(name, value)
    }

    /// Scalar value as text; `None` for missing keys, nulls and nested values.
    pub fn get_text(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.0.iter()
    }

    pub fn as_mapping(&self) -> &Mapping {
        &self.0
    }
}

impl From<Mapping> for ConfigDocument {
    fn from(mapping: Mapping) -> Self {
        Self(mapping)
    }
}

/// Render any YAML value on a single line for display and prompt defaults
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Sequence(items) => {
            let inner: Vec<String> = items.iter().map(display_value).collect();
            format!("[{}]", inner.join(", "))
        }
        Value::Mapping(map) => {
            let inner: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", display_value(k), display_value(v)))
                .collect();
            format!("{{{}}}", inner.join(", "))
        }
        Value::Tagged(tagged) => format!("{} {}", tagged.tag, display_value(&tagged.value)),
    }
}
