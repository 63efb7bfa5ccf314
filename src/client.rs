//! Log4MCP client for calling logging service methods.
//!
//! Provides typed wrappers around the five RPC methods the server exposes.

use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::Result;
use crate::protocol::{Params, Response};
use crate::session::RpcSession;

pub mod methods {
    pub const LOG_MESSAGE: &str = "log.message";
    pub const GET_ENTRIES: &str = "log.getEntries";
    pub const CLEAR: &str = "log.clear";
    pub const SET_LEVEL: &str = "log.setLevel";
    pub const CAPABILITIES: &str = "system.capabilities";
}

/// Log4MCP client.
///
/// The connection is opened at construction and released by [`close`] or on
/// drop. Every method returns the raw [`Response`]; a JSON-RPC error object is
/// a successful call from the client's point of view.
///
/// # Example
///
/// ```rust,no_run
/// use log4mcp_client::{ClientConfig, Log4McpClient, LogLevel};
///
/// let mut client = Log4McpClient::connect(ClientConfig::default().with_verbose(true))?;
///
/// client.log_message("myapp", LogLevel::Info, "Application started")?;
/// client.get_entries("myapp", Some(LogLevel::Error))?;
///
/// let response = client.get_all_entries("myapp")?;
/// if let Some(entries) = response.entries() {
///     println!("Found {} entries", entries.len());
/// }
///
/// client.close();
/// # Ok::<(), log4mcp_client::ClientError>(())
/// ```
///
/// [`close`]: Log4McpClient::close
#[derive(Debug)]
pub struct Log4McpClient {
    session: RpcSession,
}

impl Log4McpClient {
    /// Create a client and connect to the configured server.
    pub fn connect(config: ClientConfig) -> Result<Self> {
        let mut session = RpcSession::new(config);
        session.connect()?;
        Ok(Self { session })
    }

    /// Connect to `localhost:3000`.
    pub fn default_local() -> Result<Self> {
        Self::connect(ClientConfig::default())
    }

    /// Reopen the connection after [`close`](Self::close) or a transport
    /// failure. Request ids keep counting from where they were.
    pub fn reconnect(&mut self) -> Result<()> {
        self.session.connect()
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_connected()
    }

    pub fn config(&self) -> &ClientConfig {
        self.session.config()
    }

    /// Call an arbitrary method.
    pub fn call(&mut self, method: &str, params: Option<Params>) -> Result<Response> {
        self.session.call(method, params)
    }

    /// Call the `log.message` method.
    pub fn log_message(
        &mut self,
        logger_id: &str,
        level: impl AsRef<str>,
        message: &str,
    ) -> Result<Response> {
        let mut params = logger_params(logger_id);
        params.insert("level".into(), level.as_ref().into());
        params.insert("message".into(), message.into());
        self.call(methods::LOG_MESSAGE, Some(params))
    }

    /// Call the `log.getEntries` method.
    ///
    /// Without a filter the `level` key is sent as `null`.
    pub fn get_entries<L: AsRef<str>>(&mut self, logger_id: &str, level: Option<L>) -> Result<Response> {
        let mut params = logger_params(logger_id);
        let level = level.as_ref().map(|l| Value::from(l.as_ref()));
        params.insert("level".into(), level.unwrap_or(Value::Null));
        self.call(methods::GET_ENTRIES, Some(params))
    }

    /// Call `log.getEntries` without a level filter.
    pub fn get_all_entries(&mut self, logger_id: &str) -> Result<Response> {
        self.get_entries(logger_id, None::<&str>)
    }

    /// Call the `log.clear` method.
    pub fn clear_logs(&mut self, logger_id: &str) -> Result<Response> {
        self.call(methods::CLEAR, Some(logger_params(logger_id)))
    }

    /// Call the `log.setLevel` method.
    pub fn set_log_level(&mut self, logger_id: &str, level: impl AsRef<str>) -> Result<Response> {
        let mut params = logger_params(logger_id);
        params.insert("level".into(), level.as_ref().into());
        self.call(methods::SET_LEVEL, Some(params))
    }

    /// Call the `system.capabilities` method.
    pub fn get_capabilities(&mut self) -> Result<Response> {
        self.call(methods::CAPABILITIES, None)
    }

    /// Close the connection. Safe to call any number of times.
    pub fn close(&mut self) {
        self.session.close();
    }
}

fn logger_params(logger_id: &str) -> Params {
    let mut params = Params::new();
    params.insert("loggerId".into(), logger_id.into());
    params
}
