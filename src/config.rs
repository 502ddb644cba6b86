//! config.rs
//! Settings shared by every grid in a view.

use crate::engine::ValueKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_HISTORY_CAPACITY: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Maximum number of values kept per history buffer.
    pub history_capacity: usize,
    /// Static type of the values produced under each value name.
    pub value_kinds: HashMap<String, ValueKind>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { history_capacity: DEFAULT_HISTORY_CAPACITY, value_kinds: HashMap::new() }
    }
}

impl GridConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_value_kind(mut self, value_name: impl Into<String>, kind: ValueKind) -> Self {
        self.value_kinds.insert(value_name.into(), kind);
        self
    }

    pub fn value_kind(&self, value_name: &str) -> ValueKind {
        self.value_kinds.get(value_name).copied().unwrap_or_default()
    }
}
