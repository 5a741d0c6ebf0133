//! Client layer
//!
//! Thin sequencing around the codec: a transport to send argument lists,
//! a database handle, and per-graph handles that keep the name dictionary
//! fresh.

pub mod db;
pub mod graph;
pub mod transport;

pub use db::GraphClient;
pub use graph::{ConstraintType, EntityType, Graph};
pub use transport::{Connection, Transport};
