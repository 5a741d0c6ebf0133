//! Error types for graphwire

use crate::protocol::resp::RespError;
use thiserror::Error;

/// Errors surfaced by the codec and the client layer
#[derive(Error, Debug)]
pub enum GraphError {
    /// Reply shape does not match the protocol contract
    #[error("Format error: {0}")]
    Format(String),

    /// Error reply sent by the server, passed through verbatim
    #[error("{0}")]
    Server(String),

    /// RESP framing error
    #[error("Protocol error: {0}")]
    Resp(#[from] RespError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Connection could not be established or was closed
    #[error("Connection error: {0}")]
    Connection(String),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),
}

impl GraphError {
    pub(crate) fn format(msg: impl Into<String>) -> Self {
        GraphError::Format(msg.into())
    }
}

pub type GraphResult<T> = Result<T, GraphError>;
