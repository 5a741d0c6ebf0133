//! Graph wire protocol codec
//!
//! Encoding side:
//! - `literal`: Cypher literal rendering of parameter values
//! - `args`: command argument lists
//!
//! Decoding side:
//! - `resp`: the generic RESP reply tree and its framing
//! - `reply`: splitting a reply into headers, rows and metadata
//! - `decoder`: typed value decoding of compact reply cells
//! - `result`: assembling named rows
//!
//! Everything here is synchronous and free of I/O.

pub mod args;
pub mod decoder;
pub mod literal;
pub mod reply;
pub mod resp;
pub mod result;

// Re-export main types
pub use args::{build_constraint_args, build_index_args, build_query_args, Params};
pub use decoder::ValueDecoder;
pub use literal::to_cypher_literal;
pub use reply::{RawResult, SlowLogEntry};
pub use resp::{RespError, RespResult, RespValue};
pub use result::{assemble, Header, QueryResult, Row};
