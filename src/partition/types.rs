//! Parent context types

use serde_json::Value;
use std::collections::BTreeMap;

/// Key-value set derived from one parent record
///
/// Created per parent record, consumed by exactly one child run, then dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParentContext {
    /// Identifier of the parent record this context came from (used in logs)
    pub id: String,
    /// Values injected into the child's path and request parameters
    pub values: BTreeMap<String, Value>,
}

impl ParentContext {
    /// Create an empty context for the given parent identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            values: BTreeMap::new(),
        }
    }

    /// Add a value to the context
    #[must_use]
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Add a string value
    #[must_use]
    pub fn with_string(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), Value::String(value.into()));
        self
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Get a string value by key
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    /// Iterate over the context entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }
}
