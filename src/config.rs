//! Client configuration.
//!
//! Defaults mirror the stock Log4MCP server setup: `localhost:3000`, no
//! timeouts, 4 KiB reads.

use std::env;
use std::time::Duration;

use crate::error::{ClientError, Result};
use crate::{DEFAULT_HOST, DEFAULT_MAX_LINE_BYTES, DEFAULT_MAX_READ_BYTES, DEFAULT_PORT};

/// How response bytes are split off the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FramingMode {
    /// Buffer reads until a full `\n`-terminated line is available. Surplus
    /// bytes are kept for the next response.
    #[default]
    LineDelimited,
    /// Decode whatever a single read returns. A response split across TCP
    /// segments, or two responses in one segment, fails to decode.
    SingleRead,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    /// Emit every wire line on the `log4mcp_client::wire` target at INFO.
    pub verbose: bool,
    pub connect_timeout: Option<Duration>,
    pub read_timeout: Option<Duration>,
    pub write_timeout: Option<Duration>,
    /// Upper bound for a single read.
    pub max_read_bytes: usize,
    /// Upper bound for one buffered response line.
    pub max_line_bytes: usize,
    pub framing: FramingMode,
    /// Reject responses whose id differs from the request id.
    pub verify_response_id: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            verbose: false,
            connect_timeout: None,
            read_timeout: None,
            write_timeout: None,
            max_read_bytes: DEFAULT_MAX_READ_BYTES,
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
            framing: FramingMode::default(),
            verify_response_id: true,
        }
    }
}

impl ClientConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Defaults overlaid with `LOG4MCP_HOST`, `LOG4MCP_PORT`,
    /// `LOG4MCP_VERBOSE` and `LOG4MCP_TIMEOUT_MS`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(host) = lookup("LOG4MCP_HOST") {
            if host.trim().is_empty() {
                return Err(ClientError::Config("LOG4MCP_HOST is empty".into()));
            }
            config.host = host;
        }

        if let Some(port) = lookup("LOG4MCP_PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| ClientError::Config(format!("Invalid LOG4MCP_PORT: {}", port)))?;
        }

        if let Some(verbose) = lookup("LOG4MCP_VERBOSE") {
            config.verbose = match verbose.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" | "" => false,
                _ => {
                    return Err(ClientError::Config(format!(
                        "Invalid LOG4MCP_VERBOSE: {}",
                        verbose
                    )))
                }
            };
        }

        if let Some(ms) = lookup("LOG4MCP_TIMEOUT_MS") {
            let ms: u64 = ms
                .trim()
                .parse()
                .map_err(|_| ClientError::Config(format!("Invalid LOG4MCP_TIMEOUT_MS: {}", ms)))?;
            let timeout = non_zero(Duration::from_millis(ms));
            config.read_timeout = timeout;
            config.write_timeout = timeout;
        }

        Ok(config)
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = non_zero(timeout);
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = non_zero(timeout);
        self
    }

    pub fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = non_zero(timeout);
        self
    }

    /// Apply the same timeout to connect, read and write.
    ///
    /// As with the individual setters, a zero duration means no timeout.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_connect_timeout(timeout)
            .with_read_timeout(timeout)
            .with_write_timeout(timeout)
    }

    pub fn with_max_read_bytes(mut self, max: usize) -> Self {
        self.max_read_bytes = max.max(1);
        self
    }

    pub fn with_max_line_bytes(mut self, max: usize) -> Self {
        self.max_line_bytes = max.max(1);
        self
    }

    pub fn with_framing(mut self, framing: FramingMode) -> Self {
        self.framing = framing;
        self
    }

    pub fn with_verify_response_id(mut self, verify: bool) -> Self {
        self.verify_response_id = verify;
        self
    }

    /// `host:port` as used for connecting and in error messages.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// The socket API rejects a zero timeout; treat it as "no timeout".
fn non_zero(timeout: Duration) -> Option<Duration> {
    (!timeout.is_zero()).then_some(timeout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.addr(), "localhost:3000");
        assert!(!config.verbose);
        assert!(config.read_timeout.is_none());
        assert!(config.connect_timeout.is_none());
        assert_eq!(config.max_read_bytes, 4096);
        assert_eq!(config.max_line_bytes, 1024 * 1024);
        assert_eq!(config.framing, FramingMode::LineDelimited);
        assert!(config.verify_response_id);
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::new("10.0.0.5", 4000)
            .with_timeout(Duration::from_secs(2))
            .with_framing(FramingMode::SingleRead)
            .with_max_read_bytes(0);
        assert_eq!(config.addr(), "10.0.0.5:4000");
        assert_eq!(config.write_timeout, Some(Duration::from_secs(2)));
        assert_eq!(config.max_read_bytes, 1);
    }

    #[test]
    fn test_zero_timeouts_mean_none() {
        let config = ClientConfig::default().with_timeout(Duration::ZERO);
        assert!(config.connect_timeout.is_none());
        assert!(config.read_timeout.is_none());
        assert!(config.write_timeout.is_none());

        let config = ClientConfig::default()
            .with_read_timeout(Duration::from_secs(1))
            .with_read_timeout(Duration::ZERO);
        assert!(config.read_timeout.is_none());
    }

    #[test]
    fn test_env_overlay() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("LOG4MCP_HOST", "logs.internal"),
            ("LOG4MCP_PORT", "7000"),
            ("LOG4MCP_VERBOSE", "true"),
            ("LOG4MCP_TIMEOUT_MS", "1500"),
        ]))
        .unwrap();
        assert_eq!(config.addr(), "logs.internal:7000");
        assert!(config.verbose);
        assert_eq!(config.read_timeout, Some(Duration::from_millis(1500)));
        assert!(config.connect_timeout.is_none());
    }

    #[test]
    fn test_env_zero_timeout_blocks() {
        let config = ClientConfig::from_lookup(lookup(&[("LOG4MCP_TIMEOUT_MS", "0")])).unwrap();
        assert!(config.read_timeout.is_none());
    }

    #[test]
    fn test_env_invalid_port() {
        let err = ClientConfig::from_lookup(lookup(&[("LOG4MCP_PORT", "http")])).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn test_env_invalid_verbose() {
        let err = ClientConfig::from_lookup(lookup(&[("LOG4MCP_VERBOSE", "loud")])).unwrap_err();
        assert!(err.to_string().contains("LOG4MCP_VERBOSE"));
    }
}
