//! Decoded result values
//!
//! `Value` is the closed set of things a compact reply cell can turn into.
//! Callers branch on it with `match`, never by inspecting payload shapes.

use super::edge::Edge;
use super::node::Node;
use super::path::Path;
use crate::protocol::resp::RespValue;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Property map of a node or edge, in server emission order
pub type PropertyMap = IndexMap<String, Value>;

/// Geographic point
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub latitude: f64,
    pub longitude: f64,
}

impl Point {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "POINT({:.6} {:.6})", self.latitude, self.longitude)
    }
}

/// A decoded reply value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    String(String),
    Integer(i64),
    Boolean(bool),
    Double(f64),
    Array(Vec<Value>),
    Node(Node),
    Edge(Edge),
    Path(Path),
    Map(IndexMap<String, Value>),
    Point(Point),
    /// Payload of a type code this client does not interpret, untouched
    #[serde(serialize_with = "serialize_raw")]
    Unknown(RespValue),
}

impl Value {
    /// Check if value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Value::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_edge(&self) -> Option<&Edge> {
        match self {
            Value::Edge(edge) => Some(edge),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Value::Path(path) => Some(path),
            _ => None,
        }
    }

    pub fn as_point(&self) -> Option<Point> {
        match self {
            Value::Point(p) => Some(*p),
            _ => None,
        }
    }

    /// Get type name as string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::String(_) => "String",
            Value::Integer(_) => "Integer",
            Value::Boolean(_) => "Boolean",
            Value::Double(_) => "Double",
            Value::Array(_) => "Array",
            Value::Node(_) => "Node",
            Value::Edge(_) => "Edge",
            Value::Path(_) => "Path",
            Value::Map(_) => "Map",
            Value::Point(_) => "Point",
            Value::Unknown(_) => "Unknown",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Double(d) => write!(f, "{}", d),
            Value::Array(arr) => {
                write!(f, "[")?;
                for (i, val) in arr.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", val)?;
                }
                write!(f, "]")
            }
            Value::Node(node) => write!(f, "{}", node),
            Value::Edge(edge) => write!(f, "{}", edge),
            Value::Path(path) => write!(f, "{}", path),
            Value::Map(map) => write_map(f, map),
            Value::Point(point) => write!(f, "{}", point),
            Value::Unknown(raw) => write!(f, "{:?}", raw),
        }
    }
}

/// `{key: value, ...}` rendering shared by maps, nodes and edges
pub(crate) fn write_map(f: &mut fmt::Formatter<'_>, map: &IndexMap<String, Value>) -> fmt::Result {
    write!(f, "{{")?;
    for (i, (key, val)) in map.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}: {}", key, val)?;
    }
    write!(f, "}}")
}

fn serialize_raw<S: Serializer>(raw: &RespValue, serializer: S) -> Result<S::Ok, S::Error> {
    raw_to_json(raw).serialize(serializer)
}

/// JSON view of an undecoded reply fragment
pub(crate) fn raw_to_json(raw: &RespValue) -> serde_json::Value {
    match raw {
        RespValue::Null | RespValue::BulkString(None) => serde_json::Value::Null,
        RespValue::SimpleString(s) | RespValue::Error(s) => serde_json::Value::String(s.clone()),
        RespValue::BulkString(Some(data)) => {
            serde_json::Value::String(String::from_utf8_lossy(data).into_owned())
        }
        RespValue::Integer(i) => serde_json::Value::from(*i),
        RespValue::Double(d) => serde_json::Number::from_f64(*d)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        RespValue::Boolean(b) => serde_json::Value::Bool(*b),
        RespValue::Array(items) => serde_json::Value::Array(items.iter().map(raw_to_json).collect()),
    }
}

// Convenience conversions, mostly for building query parameters

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i as i64)
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Integer(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Double(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<Point> for Value {
    fn from(p: Point) -> Self {
        Value::Point(p)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(arr: Vec<T>) -> Self {
        Value::Array(arr.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(map: IndexMap<String, Value>) -> Self {
        Value::Map(map)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Value::Map(map.into_iter().collect())
    }
}

impl From<HashMap<String, Value>> for Value {
    fn from(map: HashMap<String, Value>) -> Self {
        Value::Map(map.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        assert_eq!(Value::from("a"), Value::String("a".to_string()));
        assert_eq!(Value::from(7i32), Value::Integer(7));
        assert_eq!(Value::from(vec![1i64, 2]), Value::Array(vec![Value::Integer(1), Value::Integer(2)]));
        assert_eq!(Value::from(None::<i64>), Value::Null);
    }

    #[test]
    fn test_accessors() {
        let v = Value::Double(2.5);
        assert_eq!(v.as_double(), Some(2.5));
        assert_eq!(v.as_integer(), None);
        assert_eq!(v.type_name(), "Double");
        assert!(Value::Null.is_null());
    }

    #[test]
    fn test_display() {
        let mut map = IndexMap::new();
        map.insert("b".to_string(), Value::from(1i64));
        map.insert("a".to_string(), Value::from(vec!["x"]));
        assert_eq!(Value::Map(map).to_string(), "{b: 1, a: [\"x\"]}");
        assert_eq!(Point::new(1.5, -2.0).to_string(), "POINT(1.500000 -2.000000)");
    }

    #[test]
    fn test_json_serialization() {
        let value = Value::Array(vec![
            Value::Null,
            Value::from("s"),
            Value::Point(Point::new(1.0, 2.0)),
            Value::Unknown(RespValue::Array(vec![RespValue::Integer(3), RespValue::bulk("x")])),
        ]);
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(
            json,
            serde_json::json!([null, "s", {"latitude": 1.0, "longitude": 2.0}, [3, "x"]])
        );
    }
}
