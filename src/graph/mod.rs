//! Graph value model
//!
//! Decoded values (`Value`, `Node`, `Edge`, `Path`, `Point`), the protocol
//! type codes, and the per-graph name dictionary used to resolve
//! index-coded names.

pub mod dictionary;
pub mod edge;
pub mod node;
pub mod path;
pub mod types;
pub mod value;

// Re-export main types
pub use dictionary::{Dictionary, NameTables};
pub use edge::Edge;
pub use node::Node;
pub use path::Path;
pub use types::ValueType;
pub use value::{Point, PropertyMap, Value};
