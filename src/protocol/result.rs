//! Query result assembly
//!
//! Turns a classified reply into named rows. Names inside nodes and edges
//! are resolved against the dictionary snapshot passed in; refreshing that
//! dictionary before decoding is the caller's job.

use super::decoder::{to_i64, to_string_lossy, ValueDecoder};
use super::reply::RawResult;
use crate::graph::{NameTables, Value};
use indexmap::IndexMap;
use serde::Serialize;

/// Column header of a query result
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Header {
    pub type_code: i64,
    pub name: String,
}

/// One result row, keyed by column name in column order
pub type Row = IndexMap<String, Value>;

/// Result of executing a Cypher query
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct QueryResult {
    /// Column headers
    pub headers: Vec<Header>,
    /// Tabular result rows
    pub rows: Vec<Row>,
    /// Query execution statistics, one `Name: value` line each
    pub metadata: Vec<String>,
}

/// Decode every row of a classified reply
pub fn assemble(raw: &RawResult, names: &NameTables) -> QueryResult {
    let decoder = ValueDecoder::new(names);

    let headers: Vec<Header> = raw
        .headers
        .iter()
        .flatten()
        .map(|h| match h.as_seq() {
            Some([code, name, ..]) => Header {
                type_code: to_i64(code),
                name: to_string_lossy(name),
            },
            _ => Header::default(),
        })
        .collect();

    let rows = raw
        .data
        .iter()
        .flatten()
        .map(|row| match row.as_seq() {
            Some(cells) => cells
                .iter()
                .enumerate()
                .map(|(i, cell)| (column_name(&headers, i), decoder.decode_cell(cell)))
                .collect(),
            None => Row::new(),
        })
        .collect();

    QueryResult {
        headers,
        rows,
        metadata: raw.metadata.clone(),
    }
}

fn column_name(headers: &[Header], index: usize) -> String {
    headers
        .get(index)
        .map(|h| h.name.clone())
        .unwrap_or_else(|| format!("column_{}", index))
}

impl QueryResult {
    /// Number of result rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the result has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names
    pub fn columns(&self) -> Vec<&str> {
        self.headers.iter().map(|h| h.name.as_str()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    /// Numeric value of a `Name: value [unit]` statistics line
    pub fn stat(&self, name: &str) -> Option<f64> {
        self.metadata.iter().find_map(|line| {
            let (key, rest) = line.split_once(':')?;
            if key.trim() != name {
                return None;
            }
            rest.split_whitespace().next()?.parse::<f64>().ok()
        })
    }

    fn count(&self, name: &str) -> u64 {
        self.stat(name).map_or(0, |v| v as u64)
    }

    pub fn nodes_created(&self) -> u64 {
        self.count("Nodes created")
    }

    pub fn nodes_deleted(&self) -> u64 {
        self.count("Nodes deleted")
    }

    pub fn relationships_created(&self) -> u64 {
        self.count("Relationships created")
    }

    pub fn relationships_deleted(&self) -> u64 {
        self.count("Relationships deleted")
    }

    pub fn properties_set(&self) -> u64 {
        self.count("Properties set")
    }

    pub fn labels_added(&self) -> u64 {
        self.count("Labels added")
    }

    pub fn indices_created(&self) -> u64 {
        self.count("Indices created")
    }

    /// Whether the server answered from its query cache
    pub fn cached_execution(&self) -> bool {
        self.stat("Cached execution").map_or(false, |v| v != 0.0)
    }

    pub fn internal_execution_time_ms(&self) -> Option<f64> {
        self.stat("Query internal execution time")
    }
}

impl<'a> IntoIterator for &'a QueryResult {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
