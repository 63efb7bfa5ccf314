//! Scripted Log4MCP stub server for integration tests.

#![allow(dead_code)]

use log4mcp_client::protocol::{Request, Response};
use log4mcp_client::ClientConfig;
use serde_json::{json, Value};
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

/// What the stub does after reading one request line.
pub enum Reply {
    /// Wrap the request id in `{"echo": <method>, "params": <params>}`.
    Echo,
    /// Respond with this result, echoing the request id.
    Result(Value),
    /// Respond with a JSON-RPC error object, echoing the request id.
    Error(i64, &'static str),
    /// Write these bytes verbatim.
    Raw(&'static [u8]),
    /// Write each chunk separately, pausing in between.
    Chunks(Vec<&'static [u8]>),
    /// Sleep, then hang up without answering.
    Stall(Duration),
    /// Sleep, then answer like `Echo`.
    Late(Duration),
    /// Hang up without answering.
    Close,
}

pub struct StubServer {
    pub port: u16,
    handle: thread::JoinHandle<Vec<Request>>,
}

impl StubServer {
    /// Accept one connection and answer requests according to `script`.
    pub fn start(script: Vec<Reply>) -> Self {
        Self::start_sessions(vec![script])
    }

    /// Accept one connection per script, one after the other.
    pub fn start_sessions(scripts: Vec<Vec<Reply>>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let handle = thread::spawn(move || {
            let mut received = Vec::new();
            for script in scripts {
                let (stream, _) = listener.accept().unwrap();
                serve_connection(stream, script, &mut received);
            }
            received
        });

        Self { port, handle }
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig::new("127.0.0.1", self.port)
    }

    /// Wait for the stub to finish and return the requests it read.
    pub fn received(self) -> Vec<Request> {
        self.handle.join().unwrap()
    }
}

fn serve_connection(stream: TcpStream, script: Vec<Reply>, received: &mut Vec<Request>) {
    let mut writer = stream.try_clone().unwrap();
    let mut reader = BufReader::new(stream);

    for reply in script {
        let mut line = String::new();
        if reader.read_line(&mut line).unwrap_or(0) == 0 {
            break; // Client disconnected
        }
        let request: Request = serde_json::from_str(&line).unwrap();
        let id = request.id.clone();
        let method = request.method.clone();
        let params = Value::Object(request.params.clone());
        received.push(request);

        let bytes = match reply {
            Reply::Echo => line_of(Response::success(id, json!({"echo": method, "params": params}))),
            Reply::Result(result) => line_of(Response::success(id, result)),
            Reply::Error(code, message) => line_of(Response::error(id, code, message)),
            Reply::Raw(bytes) => bytes.to_vec(),
            Reply::Chunks(chunks) => {
                for chunk in chunks {
                    if write_bytes(&mut writer, chunk).is_err() {
                        return;
                    }
                    thread::sleep(Duration::from_millis(100));
                }
                continue;
            }
            Reply::Stall(pause) => {
                thread::sleep(pause);
                break;
            }
            Reply::Late(pause) => {
                thread::sleep(pause);
                line_of(Response::success(id, json!({"echo": method, "params": params})))
            }
            Reply::Close => break,
        };

        // The client may already have hung up.
        if write_bytes(&mut writer, &bytes).is_err() {
            break;
        }
    }
}

fn write_bytes(writer: &mut TcpStream, bytes: &[u8]) -> std::io::Result<()> {
    writer.write_all(bytes)?;
    writer.flush()
}

fn line_of(response: Response) -> Vec<u8> {
    response.to_ndjson_line().unwrap().into_bytes()
}
