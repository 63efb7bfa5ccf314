//! Blocking TCP transport.
//!
//! Owns at most one socket. Usage is half-duplex: a read is only issued right
//! after a write completed, never while one is pending.

use std::io::{self, ErrorKind, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, ProtocolError, Result};
use crate::logging::wire_event;

#[derive(Debug, Default)]
pub struct TcpTransport {
    stream: Option<TcpStream>,
    /// Bytes read past the end of the last line.
    pending: Vec<u8>,
    addr: String,
    verbose: bool,
}

impl TcpTransport {
    /// A transport with no open connection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a connection to `config.host:config.port`.
    ///
    /// An already open connection is closed first.
    pub fn connect(&mut self, config: &ClientConfig) -> Result<()> {
        self.close();

        let addr = config.addr();
        let stream = open_stream(config).map_err(|source| ClientError::Connection {
            addr: addr.clone(),
            source,
        })?;

        stream
            .set_read_timeout(config.read_timeout)
            .and_then(|_| stream.set_write_timeout(config.write_timeout))
            .and_then(|_| stream.set_nodelay(true))
            .map_err(|source| ClientError::Connection {
                addr: addr.clone(),
                source,
            })?;

        wire_event(config.verbose, format_args!("Connected to {}", addr));

        self.stream = Some(stream);
        self.pending.clear();
        self.addr = addr;
        self.verbose = config.verbose;
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    /// Write all bytes to the connection.
    pub fn send(&mut self, bytes: &[u8]) -> Result<()> {
        let stream = self.stream_mut("send")?;
        stream
            .write_all(bytes)
            .and_then(|_| stream.flush())
            .map_err(|e| ClientError::transport("send", e))
    }

    /// A single blocking read of up to `max_bytes`.
    ///
    /// An empty result means the peer closed the connection.
    pub fn receive(&mut self, max_bytes: usize) -> Result<Vec<u8>> {
        if !self.pending.is_empty() {
            let n = max_bytes.min(self.pending.len());
            return Ok(self.pending.drain(..n).collect());
        }

        let mut buf = vec![0u8; max_bytes.max(1)];
        let n = self.read_chunk(&mut buf)?;
        buf.truncate(n);
        Ok(buf)
    }

    /// Read until one non-blank `\n`-terminated line is buffered and return it,
    /// terminator included.
    ///
    /// Returns an empty vector if the peer closed before sending anything. A
    /// final unterminated line is returned as is when the peer closes after it.
    /// Fails with [`ProtocolError::LineTooLong`] when a line carries more than
    /// `max_line` bytes before its terminator, or once that many are buffered
    /// without one.
    pub fn receive_line(&mut self, chunk_size: usize, max_line: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; chunk_size.max(1)];

        loop {
            while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
                if pos > max_line {
                    self.pending.clear();
                    return Err(ProtocolError::LineTooLong { limit: max_line }.into());
                }
                let line: Vec<u8> = self.pending.drain(..=pos).collect();
                if !line.iter().all(u8::is_ascii_whitespace) {
                    return Ok(line);
                }
            }

            if self.pending.len() > max_line {
                self.pending.clear();
                return Err(ProtocolError::LineTooLong { limit: max_line }.into());
            }

            let n = self.read_chunk(&mut buf)?;
            if n == 0 {
                let rest = std::mem::take(&mut self.pending);
                if rest.iter().all(u8::is_ascii_whitespace) {
                    return Ok(Vec::new());
                }
                return Ok(rest);
            }
            self.pending.extend_from_slice(&buf[..n]);
        }
    }

    /// Release the connection. Closing a closed transport is a no-op and
    /// shutdown failures are only logged.
    pub fn close(&mut self) {
        let Some(stream) = self.stream.take() else {
            return;
        };
        self.pending.clear();

        match stream.shutdown(Shutdown::Both) {
            Ok(()) => {}
            // The peer already tore the socket down.
            Err(e) if e.kind() == ErrorKind::NotConnected => {
                debug!(addr = %self.addr, "Socket already disconnected");
            }
            Err(e) => {
                warn!(addr = %self.addr, error = %e, "Error closing connection");
            }
        }

        wire_event(self.verbose, format_args!("Disconnected from {}", self.addr));
    }

    fn stream_mut(&mut self, op: &'static str) -> Result<&mut TcpStream> {
        self.stream.as_mut().ok_or_else(|| {
            ClientError::transport(op, io::Error::new(ErrorKind::NotConnected, "connection is not open"))
        })
    }

    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize> {
        let stream = self.stream_mut("receive")?;
        loop {
            match stream.read(buf) {
                Ok(n) => return Ok(n),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(ClientError::transport("receive", e)),
            }
        }
    }
}

impl Drop for TcpTransport {
    fn drop(&mut self) {
        self.close();
    }
}

fn open_stream(config: &ClientConfig) -> io::Result<TcpStream> {
    let Some(timeout) = config.connect_timeout else {
        return TcpStream::connect((config.host.as_str(), config.port));
    };

    let mut last_err = None;
    for addr in (config.host.as_str(), config.port).to_socket_addrs()? {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => last_err = Some(e),
        }
    }
    Err(last_err.unwrap_or_else(|| {
        io::Error::new(ErrorKind::InvalidInput, "host resolved to no addresses")
    }))
}
