//! Reply classification
//!
//! A query reply is either `[metadata]` (write-only queries) or
//! `[headers, rows, metadata]`. That arity is part of the protocol: any
//! other shape is a `GraphError::Format`.

use super::decoder::{split_tagged, to_f64, to_i64, to_string_lossy};
use super::resp::RespValue;
use crate::error::{GraphError, GraphResult};
use serde::Serialize;

/// A query reply split into its parts, cells still undecoded
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawResult {
    /// Header tuples; `None` for metadata-only replies
    pub headers: Option<Vec<RespValue>>,
    /// Data rows; `None` for metadata-only replies
    pub data: Option<Vec<RespValue>>,
    /// Execution statistics
    pub metadata: Vec<String>,
}

impl RawResult {
    /// Classify a raw reply by arity
    pub fn parse(reply: &RespValue) -> GraphResult<Self> {
        let parts = reply
            .as_seq()
            .ok_or_else(|| GraphError::format("unexpected reply shape"))?;

        match parts.len() {
            1 => Ok(RawResult {
                headers: None,
                data: None,
                metadata: to_string_seq(&parts[0])?,
            }),
            3 => Ok(RawResult {
                headers: parts[0].as_seq().map(<[RespValue]>::to_vec),
                data: parts[1].as_seq().map(<[RespValue]>::to_vec),
                metadata: to_string_seq(&parts[2])?,
            }),
            n => Err(GraphError::format(format!("unexpected reply length: {}", n))),
        }
    }

    /// Whether the reply carried only statistics
    pub fn is_metadata_only(&self) -> bool {
        self.headers.is_none() && self.data.is_none()
    }
}

/// Entry of the slow query log
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlowLogEntry {
    /// Unix timestamp (seconds) the query was logged at
    pub timestamp: i64,
    pub command: String,
    pub query: String,
    /// Execution time in milliseconds
    pub took_ms: f64,
}

/// Plan lines of an explain or profile reply
pub fn parse_explain(reply: &RespValue) -> GraphResult<Vec<String>> {
    to_string_seq(reply)
}

/// Slow log entries, each `[timestamp, command, query, took_ms]`
///
/// Entries that are not arrays of at least four elements are skipped.
pub fn parse_slowlog(reply: &RespValue) -> GraphResult<Vec<SlowLogEntry>> {
    let items = reply
        .as_seq()
        .ok_or_else(|| GraphError::format("unexpected slowlog reply shape"))?;

    Ok(items
        .iter()
        .filter_map(|item| match item.as_seq() {
            Some([timestamp, command, query, took, ..]) => Some(SlowLogEntry {
                timestamp: to_i64(timestamp),
                command: to_string_lossy(command),
                query: to_string_lossy(query),
                took_ms: to_f64(took),
            }),
            _ => None,
        })
        .collect())
}

/// Names listed by a catalog procedure reply
///
/// Reads the first cell of each data row of a compact
/// `[headers, rows, metadata]` reply. Returns `None` when the reply has no
/// row section, so a failed lookup leaves the cached table untouched.
pub fn extract_string_list(reply: &RespValue) -> Option<Vec<String>> {
    let parts = reply.as_seq().filter(|p| p.len() >= 2)?;
    let rows = parts[1].as_seq()?;

    Some(
        rows.iter()
            .filter_map(|row| row.as_seq().and_then(|cells| cells.first()))
            .filter_map(|cell| split_tagged(cell).and_then(|(_, payload)| payload.as_str()))
            .map(str::to_string)
            .collect(),
    )
}

/// Sequence of strings, each element rendered as text
pub fn to_string_seq(value: &RespValue) -> GraphResult<Vec<String>> {
    value
        .as_seq()
        .map(|items| items.iter().map(to_string_lossy).collect())
        .ok_or_else(|| GraphError::format("expected a sequence of strings"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(text: &str) -> RespValue {
        RespValue::bulk(text)
    }

    fn arr(items: Vec<RespValue>) -> RespValue {
        RespValue::Array(items)
    }

    #[test]
    fn test_metadata_only_reply() {
        let reply = arr(vec![arr(vec![s("Query internal execution time: 0.5 ms")])]);
        let raw = RawResult::parse(&reply).unwrap();
        assert!(raw.headers.is_none());
        assert!(raw.data.is_none());
        assert!(raw.is_metadata_only());
        assert_eq!(raw.metadata, vec!["Query internal execution time: 0.5 ms".to_string()]);
    }

    #[test]
    fn test_full_reply() {
        let reply = arr(vec![
            arr(vec![arr(vec![RespValue::Integer(1), s("n")])]),
            arr(vec![arr(vec![arr(vec![RespValue::Integer(3), RespValue::Integer(1)])])]),
            arr(vec![s("Cached execution: 0")]),
        ]);
        let raw = RawResult::parse(&reply).unwrap();
        assert_eq!(raw.headers.as_ref().map(Vec::len), Some(1));
        assert_eq!(raw.data.as_ref().map(Vec::len), Some(1));
        assert_eq!(raw.metadata, vec!["Cached execution: 0".to_string()]);
    }

    #[test]
    fn test_full_reply_with_non_sequence_parts() {
        let reply = arr(vec![RespValue::Null, s("rows"), arr(vec![])]);
        let raw = RawResult::parse(&reply).unwrap();
        assert!(raw.headers.is_none());
        assert!(raw.data.is_none());
        assert!(raw.metadata.is_empty());
    }

    #[test]
    fn test_wrong_length_is_format_error() {
        let reply = arr(vec![arr(vec![]), arr(vec![])]);
        match RawResult::parse(&reply) {
            Err(GraphError::Format(msg)) => assert_eq!(msg, "unexpected reply length: 2"),
            other => panic!("expected format error, got {:?}", other),
        }
        assert!(matches!(RawResult::parse(&arr(vec![])), Err(GraphError::Format(_))));
    }

    #[test]
    fn test_non_sequence_is_format_error() {
        let result = RawResult::parse(&s("not a sequence"));
        assert!(matches!(result, Err(GraphError::Format(_))));
    }

    #[test]
    fn test_malformed_metadata_is_format_error() {
        assert!(matches!(RawResult::parse(&arr(vec![s("stats")])), Err(GraphError::Format(_))));
        let reply = arr(vec![arr(vec![]), arr(vec![]), RespValue::Integer(1)]);
        assert!(matches!(RawResult::parse(&reply), Err(GraphError::Format(_))));
    }

    #[test]
    fn test_parse_explain() {
        let reply = arr(vec![s("Results"), s("    Project"), s("        All Node Scan | (n)")]);
        assert_eq!(parse_explain(&reply).unwrap().len(), 3);
        assert!(parse_explain(&RespValue::Integer(1)).is_err());
    }

    #[test]
    fn test_parse_slowlog() {
        let reply = arr(vec![
            arr(vec![s("1700000000"), s("GRAPH.QUERY"), s("MATCH (n) RETURN n"), s("12.5")]),
            arr(vec![s("too short")]),
        ]);
        let entries = parse_slowlog(&reply).unwrap();
        assert_eq!(
            entries,
            vec![SlowLogEntry {
                timestamp: 1_700_000_000,
                command: "GRAPH.QUERY".to_string(),
                query: "MATCH (n) RETURN n".to_string(),
                took_ms: 12.5,
            }]
        );
        assert!(parse_slowlog(&RespValue::Null).is_err());
    }

    #[test]
    fn test_extract_string_list() {
        let reply = arr(vec![
            arr(vec![arr(vec![RespValue::Integer(1), s("label")])]),
            arr(vec![
                arr(vec![arr(vec![RespValue::Integer(2), s("Person")])]),
                arr(vec![arr(vec![RespValue::Integer(2), s("City")])]),
            ]),
            arr(vec![s("Cached execution: 0")]),
        ]);
        assert_eq!(
            extract_string_list(&reply),
            Some(vec!["Person".to_string(), "City".to_string()])
        );
        assert_eq!(extract_string_list(&arr(vec![arr(vec![])])), None);
        assert_eq!(extract_string_list(&RespValue::SimpleString("OK".into())), None);
    }
}
