//! Dimension definitions

use serde::{Deserialize, Serialize};

/// A categorical or temporal axis along which metrics are sliced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub id: String,
    pub name: String,
    pub group: String,
    /// Human-readable description for UIs
    #[serde(default)]
    pub description: Option<String>,
    /// If true, the dimension has a fixed value set usable in filters
    #[serde(rename = "isEnumerable", default)]
    pub is_enumerable: bool,
    #[serde(rename = "enumValues", default)]
    pub enum_values: Vec<String>,
}

impl Dimension {
    /// Check if a value belongs to this dimension's enum set
    pub fn has_value(&self, value: &str) -> bool {
        self.is_enumerable && self.enum_values.iter().any(|v| v == value)
    }
}
