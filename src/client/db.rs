//! Database-level client

use super::graph::Graph;
use super::transport::{Connection, Transport};
use crate::config::ClientConfig;
use crate::error::{GraphError, GraphResult};
use crate::graph::Value;
use crate::protocol::args::{build_config_get_args, build_config_set_args, GRAPH_LIST};
use crate::protocol::decoder::to_string_lossy;
use crate::protocol::resp::RespValue;
use std::sync::Arc;

/// Entry point: owns the transport and hands out graph handles
#[derive(Clone)]
pub struct GraphClient {
    transport: Arc<dyn Transport>,
}

impl GraphClient {
    /// Connect to a server over TCP
    pub async fn connect(config: &ClientConfig) -> GraphResult<Self> {
        let conn = Connection::connect(config).await?;
        Ok(Self::with_transport(Arc::new(conn)))
    }

    /// Use an existing transport
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Handle on a graph; the graph is created by the server on first write
    ///
    /// Each handle starts with an empty name dictionary.
    pub fn select_graph(&self, name: &str) -> Graph {
        Graph::new(name, Arc::clone(&self.transport))
    }

    /// Names of all graphs
    pub async fn list(&self) -> GraphResult<Vec<String>> {
        let reply = self.transport.execute(vec![GRAPH_LIST.to_string()]).await?;
        Ok(reply
            .as_seq()
            .map(|items| items.iter().map(to_string_lossy).collect())
            .unwrap_or_default())
    }

    /// Read a configuration value
    ///
    /// The server answers with a `[name, value]` pair; the value is returned.
    /// Any other shape is returned as received.
    pub async fn config_get(&self, key: &str) -> GraphResult<RespValue> {
        let reply = self.transport.execute(build_config_get_args(key)).await?;
        match reply {
            RespValue::Array(mut items) if items.len() >= 2 => Ok(items.swap_remove(1)),
            other => Ok(other),
        }
    }

    /// Set a configuration value
    pub async fn config_set(&self, key: &str, value: impl Into<Value>) -> GraphResult<()> {
        self.transport
            .execute(build_config_set_args(key, &value.into()))
            .await?;
        Ok(())
    }

    /// Check the connection is alive
    pub async fn ping(&self) -> GraphResult<String> {
        match self.transport.execute(vec!["PING".to_string()]).await? {
            RespValue::SimpleString(s) => Ok(s),
            other => Err(GraphError::format(format!("unexpected PING reply: {:?}", other))),
        }
    }

    /// Server information, optionally a single section
    pub async fn info(&self, section: Option<&str>) -> GraphResult<String> {
        let mut args = vec!["INFO".to_string()];
        if let Some(section) = section {
            args.push(section.to_string());
        }
        let reply = self.transport.execute(args).await?;
        Ok(reply.as_str().map(str::to_string).unwrap_or_default())
    }
}
