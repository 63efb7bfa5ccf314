//! Error types for the Log4MCP client.
//!
//! Every failure on the call path is terminal for that call: nothing is retried
//! and nothing is swallowed, except failures while closing the connection.

use std::io;

use serde_json::Value;
use thiserror::Error;

pub type Result<T, E = ClientError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The TCP connection could not be established.
    #[error("Cannot connect to Log4MCP server at {addr}")]
    Connection {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// A call was attempted with no open connection.
    #[error("Not connected to server")]
    NotConnected,

    /// A send or receive failed on an established connection.
    #[error("Transport error during {op}")]
    Transport {
        op: &'static str,
        #[source]
        source: io::Error,
    },

    /// The peer closed the connection in place of a response.
    #[error("Server closed connection")]
    ConnectionClosed,

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The server answered with a JSON-RPC error object.
    #[error("RPC error {code}: {message}")]
    Rpc {
        code: i64,
        message: String,
        data: Option<Value>,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Bytes on the wire that do not form a valid JSON-RPC 2.0 response.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Malformed response")]
    Malformed(#[source] serde_json::Error),

    #[error("Unsupported JSON-RPC version {0:?}")]
    InvalidVersion(String),

    #[error("Response must carry exactly one of `result` or `error`")]
    InvalidPayload,

    #[error("Response id {actual:?} does not match request id {expected:?}")]
    IdMismatch { expected: String, actual: String },

    #[error("Response line exceeds {limit} bytes")]
    LineTooLong { limit: usize },

    #[error("Failed to encode request")]
    Encode(#[source] serde_json::Error),
}

impl ClientError {
    pub(crate) fn transport(op: &'static str, source: io::Error) -> Self {
        Self::Transport { op, source }
    }

    /// True for errors that leave the connection unusable.
    pub fn is_connection_lost(&self) -> bool {
        matches!(
            self,
            Self::ConnectionClosed | Self::Transport { .. } | Self::NotConnected
        )
    }
}
