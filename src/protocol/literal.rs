//! Cypher literal rendering for query parameters

use crate::graph::Value;

/// Render a value as Cypher literal text
///
/// Strings are double-quoted with backslashes escaped before quotes, so an
/// inserted escape is never escaped again. Map keys are written in lexical
/// order, which keeps the output reproducible. Values that have no literal
/// form (nodes, edges, paths, points, undecoded payloads) fall back to their
/// `Display` text; this never fails.
pub fn to_cypher_literal(value: &Value) -> String {
    let mut out = String::new();
    write_literal(&mut out, value);
    out
}

fn write_literal(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::String(s) => {
            out.push('"');
            out.push_str(&s.replace('\\', "\\\\").replace('"', "\\\""));
            out.push('"');
        }
        Value::Integer(i) => out.push_str(&i.to_string()),
        Value::Double(d) => out.push_str(&d.to_string()),
        Value::Boolean(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_literal(out, item);
            }
            out.push(']');
        }
        Value::Map(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (key, val)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(key);
                out.push(':');
                write_literal(out, val);
            }
            out.push('}');
        }
        other => out.push_str(&other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Point;
    use indexmap::IndexMap;

    #[test]
    fn test_scalars() {
        assert_eq!(to_cypher_literal(&Value::Null), "null");
        assert_eq!(to_cypher_literal(&Value::from("hello")), "\"hello\"");
        assert_eq!(to_cypher_literal(&Value::from(42i64)), "42");
        assert_eq!(to_cypher_literal(&Value::from(-7i64)), "-7");
        assert_eq!(to_cypher_literal(&Value::from(3.14)), "3.14");
        assert_eq!(to_cypher_literal(&Value::from(true)), "true");
        assert_eq!(to_cypher_literal(&Value::from(false)), "false");
    }

    #[test]
    fn test_string_escaping() {
        assert_eq!(
            to_cypher_literal(&Value::from(r#"hello "world""#)),
            r#""hello \"world\"""#
        );
        assert_eq!(
            to_cypher_literal(&Value::from(r"path\to\file")),
            r#""path\\to\\file""#
        );
        // backslash before a quote: both escaped exactly once
        assert_eq!(to_cypher_literal(&Value::from(r#"a\"b"#)), r#""a\\\"b""#);
    }

    #[test]
    fn test_array() {
        let value = Value::from(vec![1i64, 2, 3]);
        assert_eq!(to_cypher_literal(&value), "[1,2,3]");

        let nested = Value::Array(vec![Value::from("a"), Value::from(vec![true]), Value::Null]);
        assert_eq!(to_cypher_literal(&nested), "[\"a\",[true],null]");
        assert_eq!(to_cypher_literal(&Value::Array(vec![])), "[]");
    }

    #[test]
    fn test_map_keys_in_lexical_order() {
        let mut map = IndexMap::new();
        map.insert("name".to_string(), Value::from("Bob"));
        map.insert("age".to_string(), Value::from(30i64));
        map.insert("tags".to_string(), Value::from(vec!["x", "y"]));
        assert_eq!(
            to_cypher_literal(&Value::Map(map)),
            "{age:30,name:\"Bob\",tags:[\"x\",\"y\"]}"
        );

        let mut single = IndexMap::new();
        single.insert("key".to_string(), Value::from("value"));
        assert_eq!(to_cypher_literal(&Value::Map(single)), "{key:\"value\"}");
    }

    #[test]
    fn test_fallback_rendering() {
        let point = Value::Point(Point::new(1.0, 2.0));
        assert_eq!(to_cypher_literal(&point), "POINT(1.000000 2.000000)");
    }
}
