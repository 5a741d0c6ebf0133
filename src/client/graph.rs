//! Graph handle: query dispatch around the codec
//!
//! A `Graph` owns the name dictionary for one graph. Every query it runs,
//! read or write, is followed by a dictionary refresh before the reply is
//! decoded, so names created by the query itself resolve correctly.

use super::transport::Transport;
use crate::config::QueryOptions;
use crate::error::GraphResult;
use crate::graph::{Dictionary, Value};
use crate::protocol::args::{
    build_catalog_args, build_constraint_args, build_graph_args, build_query_args, create_index_query,
    drop_index_query, CATALOG_LABELS, CATALOG_PROPERTY_KEYS, CATALOG_RELATIONSHIP_TYPES, GRAPH_COPY,
    GRAPH_DELETE, GRAPH_EXPLAIN, GRAPH_MEMORY, GRAPH_PROFILE, GRAPH_QUERY, GRAPH_RO_QUERY, GRAPH_SLOWLOG,
};
use crate::protocol::reply::{extract_string_list, parse_explain, parse_slowlog, RawResult, SlowLogEntry};
use crate::protocol::resp::RespValue;
use crate::protocol::result::{assemble, QueryResult};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Kind of constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintType {
    /// Property must be present
    Mandatory,
    /// Property value must be unique
    Unique,
}

impl ConstraintType {
    pub fn as_str(self) -> &'static str {
        match self {
            ConstraintType::Mandatory => "MANDATORY",
            ConstraintType::Unique => "UNIQUE",
        }
    }
}

/// Kind of graph entity a constraint or index applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    Node,
    Relationship,
}

impl EntityType {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityType::Node => "NODE",
            EntityType::Relationship => "RELATIONSHIP",
        }
    }
}

/// Index flavours reachable through Cypher DDL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IndexKind {
    Range,
    Fulltext,
    Vector,
}

impl IndexKind {
    fn as_str(self) -> &'static str {
        match self {
            IndexKind::Range => "",
            IndexKind::Fulltext => "FULLTEXT",
            IndexKind::Vector => "VECTOR",
        }
    }
}

/// Handle on one named graph
pub struct Graph {
    name: String,
    transport: Arc<dyn Transport>,
    dictionary: Dictionary,
}

impl Graph {
    pub(crate) fn new(name: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            name: name.into(),
            transport,
            dictionary: Dictionary::new(),
        }
    }

    /// Graph name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name dictionary backing this handle
    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// Execute a read-write Cypher query
    pub async fn query(&self, query: &str) -> GraphResult<QueryResult> {
        self.execute(GRAPH_QUERY, query, &QueryOptions::default()).await
    }

    /// Execute a read-write Cypher query with parameters and/or a timeout
    pub async fn query_with(&self, query: &str, options: &QueryOptions) -> GraphResult<QueryResult> {
        self.execute(GRAPH_QUERY, query, options).await
    }

    /// Execute a read-only Cypher query
    pub async fn ro_query(&self, query: &str) -> GraphResult<QueryResult> {
        self.execute(GRAPH_RO_QUERY, query, &QueryOptions::default()).await
    }

    /// Execute a read-only Cypher query with parameters and/or a timeout
    pub async fn ro_query_with(&self, query: &str, options: &QueryOptions) -> GraphResult<QueryResult> {
        self.execute(GRAPH_RO_QUERY, query, options).await
    }

    async fn execute(&self, command: &str, query: &str, options: &QueryOptions) -> GraphResult<QueryResult> {
        let args = build_query_args(
            command,
            &self.name,
            query,
            Some(&options.params),
            options.timeout_ms,
            true,
        );
        debug!("{} on '{}'", command, self.name);

        let reply = self.transport.execute(args).await?;

        self.refresh_dictionary().await;

        let raw = RawResult::parse(&reply)?;
        let names = self.dictionary.read();
        Ok(assemble(&raw, &names))
    }

    /// Reload labels, relationship types and property keys from the server
    ///
    /// The three lookups are independent: one failing leaves its table as it
    /// was while the others still update.
    pub async fn refresh_dictionary(&self) {
        let labels = self.fetch_catalog(CATALOG_LABELS).await;
        let relationship_types = self.fetch_catalog(CATALOG_RELATIONSHIP_TYPES).await;
        let property_keys = self.fetch_catalog(CATALOG_PROPERTY_KEYS).await;
        self.dictionary.refresh(labels, relationship_types, property_keys);
    }

    async fn fetch_catalog(&self, procedure: &str) -> Option<Vec<String>> {
        match self.transport.execute(build_catalog_args(&self.name, procedure)).await {
            Ok(reply) => extract_string_list(&reply),
            Err(e) => {
                warn!("Catalog lookup '{}' on '{}' failed: {}", procedure, self.name, e);
                None
            }
        }
    }

    /// Execution plan of a query, without running it
    pub async fn explain(&self, query: &str) -> GraphResult<Vec<String>> {
        self.plan(GRAPH_EXPLAIN, query).await
    }

    /// Run a query and return its per-operation profile
    pub async fn profile(&self, query: &str) -> GraphResult<Vec<String>> {
        self.plan(GRAPH_PROFILE, query).await
    }

    async fn plan(&self, command: &str, query: &str) -> GraphResult<Vec<String>> {
        let mut args = build_graph_args(command, &self.name);
        args.push(query.to_string());
        let reply = self.transport.execute(args).await?;
        parse_explain(&reply)
    }

    /// Slow query log of this graph
    pub async fn slowlog(&self) -> GraphResult<Vec<SlowLogEntry>> {
        let reply = self.transport.execute(build_graph_args(GRAPH_SLOWLOG, &self.name)).await?;
        parse_slowlog(&reply)
    }

    /// Delete the graph and all its data
    pub async fn delete(&self) -> GraphResult<()> {
        self.transport.execute(build_graph_args(GRAPH_DELETE, &self.name)).await?;
        Ok(())
    }

    /// Copy the graph under a new name
    pub async fn copy(&self, destination: &str) -> GraphResult<()> {
        let mut args = build_graph_args(GRAPH_COPY, &self.name);
        args.push(destination.to_string());
        self.transport.execute(args).await?;
        Ok(())
    }

    /// Memory usage report, as returned by the server
    pub async fn memory_usage(&self) -> GraphResult<RespValue> {
        let args = vec![GRAPH_MEMORY.to_string(), "USAGE".to_string(), self.name.clone()];
        self.transport.execute(args).await
    }

    /// Create a constraint
    pub async fn constraint_create(
        &self,
        constraint_type: ConstraintType,
        entity_type: EntityType,
        label: &str,
        properties: &[&str],
    ) -> GraphResult<()> {
        self.constraint("CREATE", constraint_type, entity_type, label, properties).await
    }

    /// Drop a constraint
    pub async fn constraint_drop(
        &self,
        constraint_type: ConstraintType,
        entity_type: EntityType,
        label: &str,
        properties: &[&str],
    ) -> GraphResult<()> {
        self.constraint("DROP", constraint_type, entity_type, label, properties).await
    }

    async fn constraint(
        &self,
        action: &str,
        constraint_type: ConstraintType,
        entity_type: EntityType,
        label: &str,
        properties: &[&str],
    ) -> GraphResult<()> {
        let properties: Vec<String> = properties.iter().map(|p| p.to_string()).collect();
        let args = build_constraint_args(
            action,
            &self.name,
            constraint_type.as_str(),
            entity_type.as_str(),
            label,
            &properties,
        );
        self.transport.execute(args).await?;
        Ok(())
    }

    pub async fn create_node_range_index(&self, label: &str, properties: &[&str]) -> GraphResult<QueryResult> {
        self.create_index(IndexKind::Range, "NODE", label, &[], properties).await
    }

    pub async fn create_node_fulltext_index(&self, label: &str, properties: &[&str]) -> GraphResult<QueryResult> {
        self.create_index(IndexKind::Fulltext, "NODE", label, &[], properties).await
    }

    pub async fn create_node_vector_index(
        &self,
        label: &str,
        dimension: u32,
        similarity: &str,
        properties: &[&str],
    ) -> GraphResult<QueryResult> {
        let options = vector_options(dimension, similarity);
        self.create_index(IndexKind::Vector, "NODE", label, &options, properties).await
    }

    pub async fn create_edge_range_index(&self, label: &str, properties: &[&str]) -> GraphResult<QueryResult> {
        self.create_index(IndexKind::Range, "EDGE", label, &[], properties).await
    }

    pub async fn create_edge_fulltext_index(&self, label: &str, properties: &[&str]) -> GraphResult<QueryResult> {
        self.create_index(IndexKind::Fulltext, "EDGE", label, &[], properties).await
    }

    pub async fn create_edge_vector_index(
        &self,
        label: &str,
        dimension: u32,
        similarity: &str,
        properties: &[&str],
    ) -> GraphResult<QueryResult> {
        let options = vector_options(dimension, similarity);
        self.create_index(IndexKind::Vector, "EDGE", label, &options, properties).await
    }

    pub async fn drop_node_range_index(&self, label: &str, property: &str) -> GraphResult<QueryResult> {
        self.drop_index(IndexKind::Range, "NODE", label, property).await
    }

    pub async fn drop_node_fulltext_index(&self, label: &str, property: &str) -> GraphResult<QueryResult> {
        self.drop_index(IndexKind::Fulltext, "NODE", label, property).await
    }

    pub async fn drop_node_vector_index(&self, label: &str, property: &str) -> GraphResult<QueryResult> {
        self.drop_index(IndexKind::Vector, "NODE", label, property).await
    }

    pub async fn drop_edge_range_index(&self, label: &str, property: &str) -> GraphResult<QueryResult> {
        self.drop_index(IndexKind::Range, "EDGE", label, property).await
    }

    pub async fn drop_edge_fulltext_index(&self, label: &str, property: &str) -> GraphResult<QueryResult> {
        self.drop_index(IndexKind::Fulltext, "EDGE", label, property).await
    }

    pub async fn drop_edge_vector_index(&self, label: &str, property: &str) -> GraphResult<QueryResult> {
        self.drop_index(IndexKind::Vector, "EDGE", label, property).await
    }

    async fn create_index(
        &self,
        kind: IndexKind,
        entity_type: &str,
        label: &str,
        options: &[(String, Value)],
        properties: &[&str],
    ) -> GraphResult<QueryResult> {
        let properties: Vec<String> = properties.iter().map(|p| p.to_string()).collect();
        let query = create_index_query(kind.as_str(), entity_type, label, options, &properties);
        self.query(&query).await
    }

    async fn drop_index(&self, kind: IndexKind, entity_type: &str, label: &str, property: &str) -> GraphResult<QueryResult> {
        let query = drop_index_query(kind.as_str(), entity_type, label, property);
        self.query(&query).await
    }
}

fn vector_options(dimension: u32, similarity: &str) -> Vec<(String, Value)> {
    vec![
        ("dimension".to_string(), Value::from(dimension)),
        ("similarityFunction".to_string(), Value::from(similarity)),
    ]
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Graph<{}>", self.name)
    }
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph").field("name", &self.name).finish()
    }
}
