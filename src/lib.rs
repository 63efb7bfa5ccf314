//! # log4mcp-client
//!
//! Blocking JSON-RPC 2.0 client for the Log4MCP logging service.
//!
//! One TCP connection, one request in flight, newline-delimited JSON framing.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use log4mcp_client::{ClientConfig, Log4McpClient, LogLevel};
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut client = Log4McpClient::connect(ClientConfig::new("localhost", 3000))?;
//!
//!     client.log_message("myapp", LogLevel::Error, "Error occurred")?;
//!     let response = client.get_entries("myapp", Some("ERROR"))?;
//!     println!("{:?}", response.entries());
//!
//!     client.close();
//!     Ok(())
//! }
//! ```
//!
//! ## Protocol Overview
//!
//! **Request:**
//! ```json
//! {"jsonrpc":"2.0","id":"1","method":"log.message","params":{"loggerId":"myapp","level":"INFO","message":"hello"}}
//! ```
//!
//! **Response:**
//! ```json
//! {"jsonrpc":"2.0","id":"1","result":{"status":"ok"}}
//! {"jsonrpc":"2.0","id":"1","error":{"code":-32601,"message":"Method not found"}}
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod protocol;
pub mod session;
pub mod transport;

// Re-exports for convenience
pub use client::Log4McpClient;
pub use config::{ClientConfig, FramingMode};
pub use error::{ClientError, ProtocolError, Result};
pub use protocol::{decode, encode, ErrorObject, LogLevel, Params, Request, Response, ResponsePayload};
pub use session::RpcSession;
pub use transport::TcpTransport;

/// JSON-RPC protocol version
pub const JSONRPC_VERSION: &str = "2.0";

/// Default server host
pub const DEFAULT_HOST: &str = "localhost";

/// Default server port
pub const DEFAULT_PORT: u16 = 3000;

/// Default upper bound for a single socket read
pub const DEFAULT_MAX_READ_BYTES: usize = 4096;

/// Default upper bound for one buffered response line
pub const DEFAULT_MAX_LINE_BYTES: usize = 1024 * 1024;
