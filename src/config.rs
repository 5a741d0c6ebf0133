//! Client configuration
//!
//! `ClientConfig` can be built in code or loaded from YAML; any field left
//! out takes its default.

use crate::error::{GraphError, GraphResult};
use crate::graph::Value;
use crate::protocol::Params;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Connection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Server host
    pub address: String,
    /// Server port
    pub port: u16,
    /// Username for ACL authentication
    pub username: Option<String>,
    /// Password; sent with AUTH on connect when set
    pub password: Option<String>,
    /// Logical database selected after connecting
    pub database: u32,
    /// Connect timeout in milliseconds
    pub connect_timeout_ms: u64,
    /// Socket read timeout in milliseconds
    pub read_timeout_ms: u64,
    /// Socket write timeout in milliseconds (0 = same as read timeout)
    pub write_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 6379,
            username: None,
            password: None,
            database: 0,
            connect_timeout_ms: 5_000,
            read_timeout_ms: 3_000,
            write_timeout_ms: 0,
        }
    }
}

impl ClientConfig {
    /// Config for a given host and port, defaults otherwise
    pub fn new(address: impl Into<String>, port: u16) -> Self {
        Self {
            address: address.into(),
            port,
            ..Self::default()
        }
    }

    /// Parse a YAML document
    pub fn from_yaml_str(yaml: &str) -> GraphResult<Self> {
        serde_yaml::from_str(yaml).map_err(|e| GraphError::Config(e.to_string()))
    }

    /// Load a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> GraphResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| GraphError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml_str(&text)
    }

    /// `host:port`
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn write_timeout(&self) -> Duration {
        if self.write_timeout_ms == 0 {
            self.read_timeout()
        } else {
            Duration::from_millis(self.write_timeout_ms)
        }
    }
}

/// Per-query options
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOptions {
    /// Named parameters, sent as a `CYPHER` prefix
    pub params: Params,
    /// Server-side timeout in milliseconds (0 = none)
    pub timeout_ms: u64,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named parameter
    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Set the server-side timeout
    pub fn timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.endpoint(), "127.0.0.1:6379");
        assert_eq!(config.connect_timeout(), Duration::from_secs(5));
        assert_eq!(config.read_timeout(), Duration::from_secs(3));
        // write timeout follows the read timeout unless set
        assert_eq!(config.write_timeout(), Duration::from_secs(3));
        assert!(config.password.is_none());
    }

    #[test]
    fn test_partial_yaml_takes_defaults() {
        let config = ClientConfig::from_yaml_str("port: 6380\npassword: secret\nwrite_timeout_ms: 100\n").unwrap();
        assert_eq!(config.port, 6380);
        assert_eq!(config.address, "127.0.0.1");
        assert_eq!(config.password.as_deref(), Some("secret"));
        assert_eq!(config.write_timeout(), Duration::from_millis(100));
    }

    #[test]
    fn test_invalid_yaml() {
        let result = ClientConfig::from_yaml_str("port: not-a-port");
        assert!(matches!(result, Err(GraphError::Config(_))));
    }

    #[test]
    fn test_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "address: db.internal\ndatabase: 2").unwrap();

        let config = ClientConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.endpoint(), "db.internal:6379");
        assert_eq!(config.database, 2);

        assert!(ClientConfig::from_yaml_file("/nonexistent/graphwire.yaml").is_err());
    }

    #[test]
    fn test_query_options_builder() {
        let opts = QueryOptions::new().param("name", "Alice").param("age", 30i64).timeout(500);
        assert_eq!(opts.params.len(), 2);
        assert_eq!(opts.params.get("age"), Some(&Value::Integer(30)));
        assert_eq!(opts.timeout_ms, 500);
    }
}
