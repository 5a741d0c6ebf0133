//! Typed value decoding for compact replies
//!
//! A compact reply cell is a `[type_code, payload]` pair. Decoding recurses
//! through arrays, maps and paths, and resolves the integer-coded labels,
//! relationship types and property keys of nodes and edges through a
//! `NameTables` snapshot.
//!
//! Decoding never fails. Scalars are coerced with the parse-or-default
//! helpers below, which substitute the zero value for anything unparsable.
//! Entity payloads with the wrong shape decode to `Value::Null`.

use crate::graph::{Edge, NameTables, Node, Path, Point, PropertyMap, Value, ValueType};
use crate::protocol::resp::RespValue;
use indexmap::IndexMap;

/// Coerce a scalar to `i64`; unparsable input yields 0
///
/// Doubles are truncated toward zero. Strings must hold a decimal integer
/// with no surrounding whitespace.
pub fn to_i64(value: &RespValue) -> i64 {
    match value {
        RespValue::Integer(i) => *i,
        RespValue::Double(d) => *d as i64,
        RespValue::SimpleString(_) | RespValue::BulkString(Some(_)) => value
            .as_str()
            .and_then(|s| s.parse::<i64>().ok())
            .unwrap_or(0),
        _ => 0,
    }
}

/// Coerce a scalar to `f64`; unparsable input yields 0.0
pub fn to_f64(value: &RespValue) -> f64 {
    match value {
        RespValue::Double(d) => *d,
        RespValue::Integer(i) => *i as f64,
        RespValue::SimpleString(_) | RespValue::BulkString(Some(_)) => value
            .as_str()
            .and_then(|s| s.parse::<f64>().ok())
            .unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Render a scalar as text; null becomes the empty string
pub fn to_string_lossy(value: &RespValue) -> String {
    match value {
        RespValue::SimpleString(s) | RespValue::Error(s) => s.clone(),
        RespValue::BulkString(Some(data)) => String::from_utf8_lossy(data).into_owned(),
        RespValue::BulkString(None) | RespValue::Null => String::new(),
        RespValue::Integer(i) => i.to_string(),
        RespValue::Double(d) => d.to_string(),
        RespValue::Boolean(b) => b.to_string(),
        RespValue::Array(items) => {
            let parts: Vec<String> = items.iter().map(to_string_lossy).collect();
            format!("[{}]", parts.join(" "))
        }
    }
}

/// Coerce a scalar to `bool`: native booleans pass through, anything else
/// is true only when its text is exactly `true`
pub fn to_bool(value: &RespValue) -> bool {
    match value {
        RespValue::Boolean(b) => *b,
        other => to_string_lossy(other) == "true",
    }
}

/// Split a `[type_code, payload]` pair
pub fn split_tagged(cell: &RespValue) -> Option<(i64, &RespValue)> {
    match cell.as_seq() {
        Some([code, payload, ..]) => Some((to_i64(code), payload)),
        _ => None,
    }
}

/// Decoder bound to one dictionary snapshot
pub struct ValueDecoder<'a> {
    names: &'a NameTables,
}

impl<'a> ValueDecoder<'a> {
    pub fn new(names: &'a NameTables) -> Self {
        Self { names }
    }

    /// Decode a payload according to its type code
    pub fn decode(&self, type_code: i64, payload: &RespValue) -> Value {
        match ValueType::from_code(type_code) {
            ValueType::Null => Value::Null,
            ValueType::String => Value::String(to_string_lossy(payload)),
            ValueType::Integer => Value::Integer(to_i64(payload)),
            ValueType::Boolean => Value::Boolean(to_bool(payload)),
            ValueType::Double => Value::Double(to_f64(payload)),
            ValueType::Array => self.decode_array(payload),
            ValueType::Node => self.decode_node(payload).map_or(Value::Null, Value::Node),
            ValueType::Edge => self.decode_edge(payload).map_or(Value::Null, Value::Edge),
            ValueType::Path => self.decode_path(payload).map_or(Value::Null, Value::Path),
            ValueType::Map => self.decode_map(payload).map_or(Value::Null, Value::Map),
            ValueType::Point => decode_point(payload).map_or(Value::Null, Value::Point),
            ValueType::Unknown
            | ValueType::VectorF32
            | ValueType::DateTime
            | ValueType::Date
            | ValueType::Time
            | ValueType::Duration => Value::Unknown(payload.clone()),
        }
    }

    /// Decode a `[type_code, payload]` pair, or pass the cell through untouched
    pub fn decode_cell(&self, cell: &RespValue) -> Value {
        match split_tagged(cell) {
            Some((code, payload)) => self.decode(code, payload),
            None => Value::Unknown(cell.clone()),
        }
    }

    fn decode_array(&self, payload: &RespValue) -> Value {
        match payload.as_seq() {
            Some(items) => Value::Array(items.iter().map(|item| self.decode_cell(item)).collect()),
            None => Value::Null,
        }
    }

    /// `[id, [label_idx, ...], [[key_idx, type, value], ...]]`
    pub fn decode_node(&self, payload: &RespValue) -> Option<Node> {
        let parts = payload.as_seq().filter(|p| p.len() >= 3)?;

        let mut node = Node::new(to_i64(&parts[0]));
        if let Some(labels) = parts[1].as_seq() {
            node.labels = labels
                .iter()
                .map(|l| self.names.resolve_label(to_i64(l)))
                .collect();
        }
        if let Some(props) = parts[2].as_seq() {
            node.properties = self.decode_properties(props);
        }
        Some(node)
    }

    /// `[id, rel_type_idx, source_id, destination_id, [[key_idx, type, value], ...]]`
    pub fn decode_edge(&self, payload: &RespValue) -> Option<Edge> {
        let parts = payload.as_seq().filter(|p| p.len() >= 5)?;

        let mut edge = Edge::new(
            to_i64(&parts[0]),
            self.names.resolve_relationship_type(to_i64(&parts[1])),
            to_i64(&parts[2]),
            to_i64(&parts[3]),
        );
        if let Some(props) = parts[4].as_seq() {
            edge.properties = self.decode_properties(props);
        }
        Some(edge)
    }

    /// `[[ARRAY, [[NODE, node], ...]], [ARRAY, [[EDGE, edge], ...]]]`
    ///
    /// Two envelopes come off each element: the outer tagged array, then
    /// the tag of each node or edge.
    pub fn decode_path(&self, payload: &RespValue) -> Option<Path> {
        let parts = payload.as_seq().filter(|p| p.len() >= 2)?;

        let nodes = unwrap_array(&parts[0])
            .iter()
            .filter_map(|item| split_tagged(item).and_then(|(_, data)| self.decode_node(data)))
            .collect();
        let edges = unwrap_array(&parts[1])
            .iter()
            .filter_map(|item| split_tagged(item).and_then(|(_, data)| self.decode_edge(data)))
            .collect();

        Some(Path { nodes, edges })
    }

    /// Flat `key, [type, value], key, [type, value], ...`; keys are literal
    pub fn decode_map(&self, payload: &RespValue) -> Option<IndexMap<String, Value>> {
        let items = payload.as_seq()?;

        let map = items
            .chunks_exact(2)
            .map(|pair| (to_string_lossy(&pair[0]), self.decode_cell(&pair[1])))
            .collect();
        Some(map)
    }

    fn decode_properties(&self, props: &[RespValue]) -> PropertyMap {
        props
            .iter()
            .filter_map(|prop| match prop.as_seq() {
                Some([key, code, value, ..]) => Some((
                    self.names.resolve_property_key(to_i64(key)),
                    self.decode(to_i64(code), value),
                )),
                _ => None,
            })
            .collect()
    }
}

fn decode_point(payload: &RespValue) -> Option<Point> {
    match payload.as_seq() {
        Some([lat, lon, ..]) => Some(Point::new(to_f64(lat), to_f64(lon))),
        _ => None,
    }
}

/// Inner items of a `[ARRAY, [items...]]` envelope; empty when malformed
fn unwrap_array(wrapper: &RespValue) -> &[RespValue] {
    split_tagged(wrapper)
        .and_then(|(_, items)| items.as_seq())
        .unwrap_or(&[])
}
