//! JSON-RPC 2.0 envelopes and their NDJSON framing.
//!
//! Every message is a single JSON object terminated by one `\n`. There are no
//! length prefixes; the line feed is the message boundary.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::{ClientError, ProtocolError};
use crate::JSONRPC_VERSION;

/// Parameter object carried by a request.
pub type Params = Map<String, Value>;

/// JSON-RPC request from client to server.
///
/// # Example
/// ```json
/// {"jsonrpc":"2.0","id":"1","method":"log.message","params":{"loggerId":"myapp","level":"INFO","message":"hello"}}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Protocol version, always "2.0"
    pub jsonrpc: String,
    /// Request ID, unique per client instance
    pub id: String,
    /// Method name (e.g., "log.message", "system.capabilities")
    pub method: String,
    #[serde(default)]
    pub params: Params,
}

/// JSON-RPC response from server to client.
///
/// Exactly one of `result` or `error` is present on the wire; [`decode`]
/// rejects anything else.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub jsonrpc: String,
    /// Request ID (echoed from request)
    pub id: String,
    #[serde(flatten)]
    pub payload: ResponsePayload,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponsePayload {
    Result(Value),
    Error(ErrorObject),
}

/// JSON-RPC error object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Log severity understood by the Log4MCP server.
///
/// The client never validates levels passed as plain strings; this enum is a
/// convenience for callers that want the fixed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl LogLevel {
    pub const ALL: [LogLevel; 6] = [
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Fatal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
        }
    }
}

impl AsRef<str> for LogLevel {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogLevel::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown log level: {}", s))
    }
}

impl Request {
    /// Create a request with an explicit id.
    pub fn new(id: impl Into<String>, method: impl Into<String>, params: Params) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: id.into(),
            method: method.into(),
            params,
        }
    }

    /// Create a request with no parameters.
    pub fn simple(id: impl Into<String>, method: impl Into<String>) -> Self {
        Self::new(id, method, Params::new())
    }

    /// Serialize request to NDJSON line.
    pub fn to_ndjson_line(&self) -> Result<String, ProtocolError> {
        let json = serde_json::to_string(self).map_err(ProtocolError::Encode)?;
        Ok(format!("{}\n", json))
    }
}

impl Response {
    /// Create a success response.
    pub fn success(id: impl Into<String>, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: id.into(),
            payload: ResponsePayload::Result(result),
        }
    }

    /// Create an error response.
    pub fn error(id: impl Into<String>, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: id.into(),
            payload: ResponsePayload::Error(ErrorObject {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.payload, ResponsePayload::Result(_))
    }

    pub fn result(&self) -> Option<&Value> {
        match &self.payload {
            ResponsePayload::Result(value) => Some(value),
            ResponsePayload::Error(_) => None,
        }
    }

    pub fn error_object(&self) -> Option<&ErrorObject> {
        match &self.payload {
            ResponsePayload::Result(_) => None,
            ResponsePayload::Error(err) => Some(err),
        }
    }

    /// Consume the response, turning a JSON-RPC error object into
    /// [`ClientError::Rpc`].
    pub fn into_result(self) -> Result<Value, ClientError> {
        match self.payload {
            ResponsePayload::Result(value) => Ok(value),
            ResponsePayload::Error(err) => Err(ClientError::Rpc {
                code: err.code,
                message: err.message,
                data: err.data,
            }),
        }
    }

    /// The `result.entries` array returned by `log.getEntries`, if present.
    pub fn entries(&self) -> Option<&Vec<Value>> {
        self.result()?.get("entries")?.as_array()
    }

    /// Serialize response to NDJSON line.
    pub fn to_ndjson_line(&self) -> Result<String, ProtocolError> {
        let json = serde_json::to_string(self).map_err(ProtocolError::Encode)?;
        Ok(format!("{}\n", json))
    }
}

/// Encode a request as one NDJSON line.
pub fn encode(request: &Request) -> Result<Vec<u8>, ProtocolError> {
    request.to_ndjson_line().map(String::into_bytes)
}

/// Decode one JSON-RPC response from raw bytes.
///
/// The bytes must hold exactly one JSON document; trailing whitespace
/// (including the line feed) is ignored, anything else is malformed.
pub fn decode(bytes: &[u8]) -> Result<Response, ProtocolError> {
    let raw: RawResponse = serde_json::from_slice(bytes).map_err(ProtocolError::Malformed)?;

    if raw.jsonrpc != JSONRPC_VERSION {
        return Err(ProtocolError::InvalidVersion(raw.jsonrpc));
    }

    let payload = match (raw.result, raw.error) {
        (Some(result), None) => ResponsePayload::Result(result),
        (None, Some(error)) => ResponsePayload::Error(error),
        _ => return Err(ProtocolError::InvalidPayload),
    };

    Ok(Response {
        jsonrpc: raw.jsonrpc,
        id: raw.id,
        payload,
    })
}

#[derive(Deserialize)]
struct RawResponse {
    jsonrpc: String,
    id: String,
    // `"result": null` is a valid success, so presence must survive a null value.
    #[serde(default, deserialize_with = "present")]
    result: Option<Value>,
    #[serde(default)]
    error: Option<ErrorObject>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}
