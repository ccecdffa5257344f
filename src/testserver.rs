//! Minimal in-process HTTP/1.1 server for tests
//!
//! Binds an ephemeral port and answers each connection with whatever the
//! handler returns. Connections are one-shot (`Connection: close`), which
//! matches the transport's one-exchange-per-agent behaviour.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;

/// A request as the server saw it.
pub struct ReceivedRequest {
    pub method: String,
    /// Request target, e.g. "/api/search?category=Movies&text=alien"
    pub target: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl ReceivedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

pub type Handler = dyn Fn(&ReceivedRequest) -> (u16, Vec<u8>) + Send + Sync;

pub struct TestServer {
    addr: SocketAddr,
}

impl TestServer {
    /// Start a server; the accept loop runs until the test process exits.
    pub fn spawn<F>(handler: F) -> Self
    where
        F: Fn(&ReceivedRequest) -> (u16, Vec<u8>) + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server");
        let addr = listener.local_addr().expect("test server addr");
        let handler: Arc<Handler> = Arc::new(handler);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                let handler = Arc::clone(&handler);
                thread::spawn(move || handle(stream, &handler));
            }
        });
        Self { addr }
    }

    /// Base URL of the server, usable as a core's server address.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

/// Shorthand for a 200 response carrying a JSON body.
pub fn ok_json(body: &str) -> (u16, Vec<u8>) {
    (200, body.as_bytes().to_vec())
}

fn handle(stream: TcpStream, handler: &Arc<Handler>) {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or("").to_string();
    let target = parts.next().unwrap_or("").to_string();

    let mut headers = Vec::new();
    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).is_err() {
            return;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim().to_string();
            let value = value.trim().to_string();
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.parse().unwrap_or(0);
            }
            headers.push((name, value));
        }
    }

    let mut body = vec![0u8; content_length];
    if content_length > 0 && reader.read_exact(&mut body).is_err() {
        return;
    }

    let request = ReceivedRequest {
        method,
        target,
        headers,
        body,
    };
    let (status, response_body) = handler(&request);
    let reason = match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Error",
    };
    let mut stream = reader.into_inner();
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        reason,
        response_body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&response_body);
    let _ = stream.flush();
}
