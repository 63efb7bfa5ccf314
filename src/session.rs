//! JSON-RPC session: id allocation and one synchronous exchange per call.

use tracing::debug;

use crate::config::{ClientConfig, FramingMode};
use crate::error::{ClientError, ProtocolError, Result};
use crate::logging::wire_event;
use crate::protocol::{self, Params, Request, Response};
use crate::transport::TcpTransport;

/// Drives request/response exchanges over a [`TcpTransport`].
///
/// Ids come from a per-session counter starting at 1. They are never reused,
/// not even after a failed call or a reconnect.
#[derive(Debug)]
pub struct RpcSession {
    transport: TcpTransport,
    config: ClientConfig,
    last_id: u64,
}

impl RpcSession {
    /// A session with no open connection.
    pub fn new(config: ClientConfig) -> Self {
        Self {
            transport: TcpTransport::new(),
            config,
            last_id: 0,
        }
    }

    /// Open (or reopen) the connection described by the config.
    pub fn connect(&mut self) -> Result<()> {
        self.transport.connect(&self.config)
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_open()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Id of the most recent request, `0` before the first call.
    pub fn last_id(&self) -> u64 {
        self.last_id
    }

    /// Send one request and wait for its response.
    ///
    /// The returned response may carry a JSON-RPC error object; it is not
    /// inspected here. When the exchange fails in a way that can leave the
    /// stream misaligned (I/O failure, timeout, peer close, id mismatch,
    /// oversized line) the connection is closed and later calls fail with
    /// [`ClientError::NotConnected`] until the session reconnects.
    pub fn call(&mut self, method: &str, params: Option<Params>) -> Result<Response> {
        if !self.transport.is_open() {
            return Err(ClientError::NotConnected);
        }

        self.last_id += 1;
        let request = Request::new(self.last_id.to_string(), method, params.unwrap_or_default());

        let line = request.to_ndjson_line()?;

        match self.exchange(&request, &line) {
            Ok(response) => {
                debug!(
                    method = %request.method,
                    id = %request.id,
                    ok = response.is_success(),
                    "Request complete"
                );
                Ok(response)
            }
            Err(e) => {
                // A late or partial response would be read by the next call.
                if self.loses_sync(&e) {
                    debug!(id = %request.id, error = %e, "Dropping connection after failed call");
                    self.transport.close();
                }
                Err(e)
            }
        }
    }

    fn exchange(&mut self, request: &Request, line: &str) -> Result<Response> {
        wire_event(self.config.verbose, format_args!(">>> {}", line.trim_end()));
        self.transport.send(line.as_bytes())?;

        let bytes = match self.config.framing {
            FramingMode::LineDelimited => self
                .transport
                .receive_line(self.config.max_read_bytes, self.config.max_line_bytes)?,
            FramingMode::SingleRead => self.transport.receive(self.config.max_read_bytes)?,
        };
        if bytes.is_empty() {
            return Err(ClientError::ConnectionClosed);
        }

        wire_event(
            self.config.verbose,
            format_args!("<<< {}", String::from_utf8_lossy(&bytes).trim_end()),
        );

        let response = protocol::decode(&bytes)?;

        if self.config.verify_response_id && response.id != request.id {
            return Err(ProtocolError::IdMismatch {
                expected: request.id.clone(),
                actual: response.id,
            }
            .into());
        }

        Ok(response)
    }

    /// Whether `err` may leave response bytes on the stream that belong to
    /// this call.
    fn loses_sync(&self, err: &ClientError) -> bool {
        match err {
            // Line framing consumed the whole line before decoding.
            ClientError::Protocol(
                ProtocolError::Malformed(_)
                | ProtocolError::InvalidVersion(_)
                | ProtocolError::InvalidPayload,
            ) => self.config.framing == FramingMode::SingleRead,
            _ => true,
        }
    }

    /// Release the connection. Never fails; see [`TcpTransport::close`].
    pub fn close(&mut self) {
        self.transport.close();
    }
}
