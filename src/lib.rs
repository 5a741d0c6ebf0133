//! graphwire
//!
//! Client-side codec for a Cypher graph database spoken over the Redis
//! protocol (RESP), plus a small async client around it.
//!
//! # Architecture
//!
//! - `protocol`: the codec. Builds command argument lists (with Cypher
//!   literal parameters) and decodes compact `[type, payload]` replies into
//!   typed values. Pure and synchronous.
//! - `graph`: the decoded value model and the per-graph name dictionary that
//!   resolves index-coded labels, relationship types and property keys.
//! - `client`: transport seam, TCP connection, database and graph handles.
//! - `config`: connection and query options.
//!
//! ## Example Usage
//!
//! ```no_run
//! use graphwire::{ClientConfig, GraphClient, QueryOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), graphwire::GraphError> {
//!     let client = GraphClient::connect(&ClientConfig::default()).await?;
//!     let graph = client.select_graph("social");
//!
//!     graph.query(r#"CREATE (:Person {name: "Alice"})-[:KNOWS]->(:Person {name: "Bob"})"#)
//!         .await?;
//!
//!     let opts = QueryOptions::new().param("name", "Alice");
//!     let result = graph
//!         .ro_query_with("MATCH (a:Person {name: $name})-[r]->(b) RETURN a, r, b", &opts)
//!         .await?;
//!     for row in &result {
//!         println!("{} {} {}", row["a"], row["r"], row["b"]);
//!     }
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod config;
pub mod error;
pub mod graph;
pub mod protocol;

// Re-export main types for convenience
pub use client::{Connection, ConstraintType, EntityType, Graph, GraphClient, Transport};
pub use config::{ClientConfig, QueryOptions};
pub use error::{GraphError, GraphResult};
pub use graph::{Dictionary, Edge, NameTables, Node, Path, Point, PropertyMap, Value, ValueType};
pub use protocol::{Header, Params, QueryResult, RawResult, RespValue, Row, SlowLogEntry};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
