//! Variable table
//!
//! Flat name → value map. Entries are created on first assignment and
//! overwritten on reassignment; nothing is ever removed.

use crate::value::{RuntimeError, Value};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Variables {
    entries: HashMap<String, Value>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `name`, replacing any previous value
    pub fn set(&mut self, name: &str, value: Value) {
        self.entries.insert(name.to_string(), value);
    }

    /// Look up `name`
    pub fn get(&self, name: &str) -> Result<&Value, RuntimeError> {
        self.entries
            .get(name)
            .ok_or_else(|| RuntimeError::UndefinedVariable {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all bindings (unordered)
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}
