//! Rule context: the data rules read and mutate during a dispatch.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use rulehook_core::AppResult;

use crate::update::update_value;

/// Context handed to conditions, validators, and actions.
///
/// `data` is the target document that rule actions write into, usually
/// through [`RuleContext::update`]. `metadata` carries caller-supplied
/// facts that rules may inspect but that are not part of the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleContext {
    /// The document being operated on.
    pub data: Value,
    /// Arbitrary caller data keyed by string.
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

impl RuleContext {
    /// Creates a context around a document.
    pub fn new(data: Value) -> Self {
        Self {
            data,
            metadata: HashMap::new(),
        }
    }

    /// Inserts a metadata value.
    pub fn with_metadata(mut self, key: &str, value: Value) -> Self {
        self.metadata.insert(key.to_string(), value);
        self
    }

    /// Inserts a string metadata value.
    pub fn with_string(self, key: &str, value: &str) -> Self {
        self.with_metadata(key, serde_json::json!(value))
    }

    /// Inserts a boolean metadata value.
    pub fn with_bool(self, key: &str, value: bool) -> Self {
        self.with_metadata(key, serde_json::json!(value))
    }

    /// Gets a metadata value by key.
    pub fn get_metadata(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }

    /// Gets a string metadata value.
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(|v| v.as_str())
    }

    /// Gets a bool metadata value.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.metadata.get(key).and_then(|v| v.as_bool())
    }

    /// Looks up a value in `data` by dotted path (`"user.tags.0"`).
    pub fn get(&self, path: &str) -> Option<&Value> {
        path.split('.').try_fold(&self.data, |current, segment| match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
    }

    /// Writes `value` into `data` at a dotted path.
    pub fn update(&mut self, key: &str, value: Value) -> AppResult<()> {
        update_value(&mut self.data, key, value)
    }
}

impl From<Value> for RuleContext {
    fn from(data: Value) -> Self {
        Self::new(data)
    }
}
