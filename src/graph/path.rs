//! Decoded path

use super::edge::Edge;
use super::node::Node;
use serde::Serialize;
use std::fmt;

/// Alternating sequence of nodes and the edges between them
///
/// A well-formed path has one edge fewer than it has nodes. This is not
/// checked: malformed server output is kept as received.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Path {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Path {
    /// Number of edges in the path
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn first_node(&self) -> Option<&Node> {
        self.nodes.first()
    }

    pub fn last_node(&self) -> Option<&Node> {
        self.nodes.last()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nodes.is_empty() {
            return write!(f, "(empty path)");
        }
        for (i, node) in self.nodes.iter().enumerate() {
            write!(f, "{}", node)?;
            if let Some(edge) = self.edges.get(i) {
                write!(f, "{}", edge)?;
            }
        }
        Ok(())
    }
}
