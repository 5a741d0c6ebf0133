//! Decoded graph node

use super::value::{write_map, PropertyMap, Value};
use serde::Serialize;
use std::fmt;

/// A node as returned by the server
///
/// Labels and properties keep the order the server emitted them in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    /// Internal node identifier
    pub id: i64,

    /// Labels, resolved through the graph's name dictionary
    pub labels: Vec<String>,

    /// Properties associated with this node
    pub properties: PropertyMap,
}

impl Node {
    /// Create a node with no labels or properties
    pub fn new(id: i64) -> Self {
        Node {
            id,
            labels: Vec::new(),
            properties: PropertyMap::new(),
        }
    }

    /// Check if node has a specific label
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// Get a property value
    pub fn get_property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(:{} ", self.labels.join(":"))?;
        write_map(f, &self.properties)?;
        write!(f, ")")
    }
}
