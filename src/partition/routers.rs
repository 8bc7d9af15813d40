//! Parent record router

use super::types::ParentContext;
use crate::decode::extract_path;
use crate::error::{Error, Result};
use serde_json::Value;

/// Derives child contexts from parent records
///
/// `parent_key` is a dotted path into the parent record (for example
/// `profile.id` for the embedded profile); the value found there is stored
/// under `context_key` in the derived context.
#[derive(Debug, Clone)]
pub struct ParentRouter {
    /// Name of the child stream (used in error reports)
    child_stream: String,
    /// Path to extract from parent records
    parent_key: String,
    /// Context key the extracted value is stored under
    context_key: String,
}

impl ParentRouter {
    /// Create a new parent router
    pub fn new(
        child_stream: impl Into<String>,
        parent_key: impl Into<String>,
        context_key: impl Into<String>,
    ) -> Self {
        Self {
            child_stream: child_stream.into(),
            parent_key: parent_key.into(),
            context_key: context_key.into(),
        }
    }

    /// Path read from the parent record
    pub fn parent_key(&self) -> &str {
        &self.parent_key
    }

    /// Key the value is stored under in the context
    pub fn context_key(&self) -> &str {
        &self.context_key
    }

    /// Derive the child context for one parent record
    ///
    /// Fails with a missing-field error when the parent key is absent, null,
    /// empty, or not a scalar.
    pub fn derive_context(&self, parent: &Value) -> Result<ParentContext> {
        let value = match extract_path(parent, &self.parent_key) {
            Some(Value::String(s)) if !s.is_empty() => Value::String(s),
            Some(Value::Number(n)) => Value::Number(n),
            _ => return Err(Error::missing_field(&self.child_stream, &self.parent_key)),
        };

        let id = match &value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };

        Ok(ParentContext::new(id).with_value(self.context_key.clone(), value))
    }
}
