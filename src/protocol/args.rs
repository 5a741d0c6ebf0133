//! Command argument construction
//!
//! Pure functions from a request description to the ordered argument list
//! sent on the wire. Inputs are not validated; they are rendered as given.

use super::literal::to_cypher_literal;
use crate::graph::Value;
use std::collections::BTreeMap;

pub const GRAPH_QUERY: &str = "GRAPH.QUERY";
pub const GRAPH_RO_QUERY: &str = "GRAPH.RO_QUERY";
pub const GRAPH_EXPLAIN: &str = "GRAPH.EXPLAIN";
pub const GRAPH_PROFILE: &str = "GRAPH.PROFILE";
pub const GRAPH_SLOWLOG: &str = "GRAPH.SLOWLOG";
pub const GRAPH_DELETE: &str = "GRAPH.DELETE";
pub const GRAPH_COPY: &str = "GRAPH.COPY";
pub const GRAPH_LIST: &str = "GRAPH.LIST";
pub const GRAPH_MEMORY: &str = "GRAPH.MEMORY";
pub const GRAPH_CONFIG: &str = "GRAPH.CONFIG";
pub const GRAPH_CONSTRAINT: &str = "GRAPH.CONSTRAINT";

/// Flag asking the server for the compact (index-coded) reply encoding
pub const COMPACT_FLAG: &str = "--compact";

/// Named query parameters; iteration is in lexical key order
pub type Params = BTreeMap<String, Value>;

/// Catalog procedures backing the name dictionary
pub const CATALOG_LABELS: &str = "CALL db.labels()";
pub const CATALOG_RELATIONSHIP_TYPES: &str = "CALL db.relationshipTypes()";
pub const CATALOG_PROPERTY_KEYS: &str = "CALL db.propertyKeys()";

/// Arguments for `GRAPH.QUERY` / `GRAPH.RO_QUERY`
///
/// Non-empty params are prepended to the query as `CYPHER k1=v1 k2=v2 `.
/// A positive timeout adds `TIMEOUT <ms>`; `compact` adds `--compact`.
pub fn build_query_args(
    command: &str,
    graph: &str,
    query: &str,
    params: Option<&Params>,
    timeout_ms: u64,
    compact: bool,
) -> Vec<String> {
    let query = match params {
        Some(params) if !params.is_empty() => format!("CYPHER {} {}", params_to_string(params), query),
        _ => query.to_string(),
    };

    let mut args = vec![command.to_string(), graph.to_string(), query];

    if timeout_ms > 0 {
        args.push("TIMEOUT".to_string());
        args.push(timeout_ms.to_string());
    }

    if compact {
        args.push(COMPACT_FLAG.to_string());
    }

    args
}

/// Space-joined `key=literal` pairs
pub fn params_to_string(params: &Params) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{}={}", key, to_cypher_literal(value)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Arguments for `GRAPH.CONSTRAINT CREATE|DROP`
pub fn build_constraint_args(
    action: &str,
    graph: &str,
    constraint_type: &str,
    entity_type: &str,
    label: &str,
    properties: &[String],
) -> Vec<String> {
    let mut args = vec![
        GRAPH_CONSTRAINT.to_string(),
        action.to_string(),
        graph.to_string(),
        constraint_type.to_string(),
        entity_type.to_string(),
        label.to_string(),
        "PROPERTIES".to_string(),
        properties.len().to_string(),
    ];
    args.extend(properties.iter().cloned());
    args
}

/// Arguments for an index command
///
/// `index_type` and `entity_type` are only emitted when non-empty. Options
/// (vector dimension, similarity function) follow the label as key/value
/// token pairs in the order given.
pub fn build_index_args(
    command: &str,
    graph: &str,
    index_type: &str,
    entity_type: &str,
    label: &str,
    options: &[(String, Value)],
    properties: &[String],
) -> Vec<String> {
    let mut args = vec![command.to_string(), graph.to_string()];

    if !index_type.is_empty() {
        args.push(index_type.to_string());
    }
    if !entity_type.is_empty() {
        args.push(entity_type.to_string());
    }

    args.push(label.to_string());

    for (key, value) in options {
        args.push(key.clone());
        args.push(to_arg(value));
    }

    args.push("PROPERTIES".to_string());
    args.push(properties.len().to_string());
    args.extend(properties.iter().cloned());
    args
}

/// `[command, graph]` for graph-scoped commands without further arguments
pub fn build_graph_args(command: &str, graph: &str) -> Vec<String> {
    vec![command.to_string(), graph.to_string()]
}

/// Read-only compact query against a catalog procedure
pub fn build_catalog_args(graph: &str, procedure: &str) -> Vec<String> {
    build_query_args(GRAPH_RO_QUERY, graph, procedure, None, 0, true)
}

pub fn build_config_get_args(key: &str) -> Vec<String> {
    vec![GRAPH_CONFIG.to_string(), "GET".to_string(), key.to_string()]
}

pub fn build_config_set_args(key: &str, value: &Value) -> Vec<String> {
    vec![
        GRAPH_CONFIG.to_string(),
        "SET".to_string(),
        key.to_string(),
        to_arg(value),
    ]
}

/// Cypher statement creating an index
///
/// Node patterns are `(e:Label)`, edge patterns `()-[e:Label]->()`. Options
/// render as `OPTIONS {key:value, ...}` with strings single-quoted.
pub fn create_index_query(
    index_type: &str,
    entity_type: &str,
    label: &str,
    options: &[(String, Value)],
    properties: &[String],
) -> String {
    let props = properties
        .iter()
        .map(|p| format!("e.{}", p))
        .collect::<Vec<_>>()
        .join(", ");

    let mut query = format!(
        "CREATE {}INDEX FOR {} ON ({})",
        type_prefix(index_type),
        index_pattern(entity_type, label),
        props
    );

    if !options.is_empty() {
        let opts = options
            .iter()
            .map(|(key, value)| match value {
                Value::String(s) => format!("{}:'{}'", key, s),
                other => format!("{}:{}", key, to_cypher_literal(other)),
            })
            .collect::<Vec<_>>()
            .join(", ");
        query.push_str(&format!(" OPTIONS {{{}}}", opts));
    }

    query
}

/// Cypher statement dropping an index on one property
pub fn drop_index_query(index_type: &str, entity_type: &str, label: &str, property: &str) -> String {
    format!(
        "DROP {}INDEX FOR {} ON (e.{})",
        type_prefix(index_type),
        index_pattern(entity_type, label),
        property
    )
}

fn type_prefix(index_type: &str) -> String {
    if index_type.is_empty() {
        String::new()
    } else {
        format!("{} ", index_type)
    }
}

fn index_pattern(entity_type: &str, label: &str) -> String {
    if entity_type == "NODE" {
        format!("(e:{})", label)
    } else {
        format!("()-[e:{}]->()", label)
    }
}

/// Plain argument text: strings verbatim, everything else as a literal
fn to_arg(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => to_cypher_literal(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_query_args_without_params() {
        let args = build_query_args(GRAPH_QUERY, "g", "MATCH (n) RETURN n", None, 0, true);
        assert_eq!(args, strings(&["GRAPH.QUERY", "g", "MATCH (n) RETURN n", "--compact"]));

        let args = build_query_args(GRAPH_RO_QUERY, "g", "RETURN 1", None, 0, false);
        assert_eq!(args, strings(&["GRAPH.RO_QUERY", "g", "RETURN 1"]));
    }

    #[test]
    fn test_query_args_with_params() {
        let mut params = Params::new();
        params.insert("name".to_string(), Value::from("test"));
        let args = build_query_args(GRAPH_QUERY, "g", "MATCH (n {name: $name}) RETURN n", Some(&params), 0, true);

        assert_eq!(args.len(), 4);
        assert!(args[2].starts_with("CYPHER "));
        assert_eq!(args[2], "CYPHER name=\"test\" MATCH (n {name: $name}) RETURN n");
    }

    #[test]
    fn test_query_params_in_lexical_order() {
        let mut params = Params::new();
        params.insert("b".to_string(), Value::from(2i64));
        params.insert("a".to_string(), Value::from(vec![1i64]));
        params.insert("c".to_string(), Value::Null);
        let args = build_query_args(GRAPH_QUERY, "g", "RETURN $a", Some(&params), 0, false);
        assert_eq!(args[2], "CYPHER a=[1] b=2 c=null RETURN $a");
    }

    #[test]
    fn test_empty_params_leave_query_untouched() {
        let params = Params::new();
        let args = build_query_args(GRAPH_QUERY, "g", "RETURN 1", Some(&params), 0, false);
        assert_eq!(args[2], "RETURN 1");
    }

    #[test]
    fn test_query_args_with_timeout() {
        let args = build_query_args(GRAPH_QUERY, "g", "RETURN 1", None, 5000, true);
        let pos = args.iter().position(|a| a == "TIMEOUT").unwrap();
        assert_eq!(args[pos + 1], "5000");
        assert_eq!(args.last().map(String::as_str), Some("--compact"));
    }

    #[test]
    fn test_constraint_args() {
        let props = strings(&["email", "name"]);
        let args = build_constraint_args("CREATE", "g", "UNIQUE", "NODE", "Person", &props);
        assert_eq!(
            args,
            strings(&[
                "GRAPH.CONSTRAINT", "CREATE", "g", "UNIQUE", "NODE", "Person", "PROPERTIES", "2", "email", "name",
            ])
        );

        let args = build_constraint_args("DROP", "g", "MANDATORY", "RELATIONSHIP", "KNOWS", &[]);
        assert_eq!(args.len(), 8);
        assert_eq!(args[7], "0");
    }

    #[test]
    fn test_index_args_skip_empty_type_tokens() {
        let args = build_index_args("GRAPH.INDEX", "g", "", "", "Person", &[], &strings(&["name"]));
        assert_eq!(args, strings(&["GRAPH.INDEX", "g", "Person", "PROPERTIES", "1", "name"]));
    }

    #[test]
    fn test_index_args_with_options() {
        let options = vec![
            ("dimension".to_string(), Value::from(128i64)),
            ("similarityFunction".to_string(), Value::from("euclidean")),
        ];
        let args = build_index_args(
            "GRAPH.INDEX", "g", "VECTOR", "NODE", "Doc", &options, &strings(&["embedding"]),
        );
        assert_eq!(
            args,
            strings(&[
                "GRAPH.INDEX", "g", "VECTOR", "NODE", "Doc", "dimension", "128",
                "similarityFunction", "euclidean", "PROPERTIES", "1", "embedding",
            ])
        );
    }

    #[test]
    fn test_catalog_and_config_args() {
        assert_eq!(
            build_catalog_args("g", CATALOG_LABELS),
            strings(&["GRAPH.RO_QUERY", "g", "CALL db.labels()", "--compact"])
        );
        assert_eq!(
            build_config_get_args("RESULTSET_SIZE"),
            strings(&["GRAPH.CONFIG", "GET", "RESULTSET_SIZE"])
        );
        assert_eq!(
            build_config_set_args("RESULTSET_SIZE", &Value::from(1000i64)),
            strings(&["GRAPH.CONFIG", "SET", "RESULTSET_SIZE", "1000"])
        );
    }

    #[test]
    fn test_index_queries() {
        assert_eq!(
            create_index_query("", "NODE", "Person", &[], &strings(&["name", "age"])),
            "CREATE INDEX FOR (e:Person) ON (e.name, e.age)"
        );
        assert_eq!(
            create_index_query("FULLTEXT", "EDGE", "KNOWS", &[], &strings(&["note"])),
            "CREATE FULLTEXT INDEX FOR ()-[e:KNOWS]->() ON (e.note)"
        );
        let options = vec![
            ("dimension".to_string(), Value::from(3i64)),
            ("similarityFunction".to_string(), Value::from("cosine")),
        ];
        assert_eq!(
            create_index_query("VECTOR", "NODE", "Doc", &options, &strings(&["v"])),
            "CREATE VECTOR INDEX FOR (e:Doc) ON (e.v) OPTIONS {dimension:3, similarityFunction:'cosine'}"
        );
        assert_eq!(
            drop_index_query("", "EDGE", "KNOWS", "since"),
            "DROP INDEX FOR ()-[e:KNOWS]->() ON (e.since)"
        );
    }
}
