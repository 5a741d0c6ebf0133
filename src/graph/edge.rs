//! Decoded graph edge

use super::value::{write_map, PropertyMap, Value};
use serde::Serialize;
use std::fmt;

/// A directed edge as returned by the server
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    /// Internal edge identifier
    pub id: i64,

    /// Relationship type, resolved through the graph's name dictionary
    #[serde(rename = "type")]
    pub relationship_type: String,

    /// Source node (edge goes FROM this node)
    pub source_id: i64,

    /// Destination node (edge goes TO this node)
    pub destination_id: i64,

    /// Properties associated with this edge
    pub properties: PropertyMap,
}

impl Edge {
    pub fn new(id: i64, relationship_type: impl Into<String>, source_id: i64, destination_id: i64) -> Self {
        Edge {
            id,
            relationship_type: relationship_type.into(),
            source_id,
            destination_id,
            properties: PropertyMap::new(),
        }
    }

    /// Get a property value
    pub fn get_property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "-[:{} ", self.relationship_type)?;
        write_map(f, &self.properties)?;
        write!(f, "]->")
    }
}
