//! Blocking HTTP/1.1 request parsing and response writing.
//!
//! One request per connection, no request bodies, no chunked encoding.
//! The header section is capped at 32 KiB.

use crate::error::{RepoTableError, Result};
use serde::Serialize;
use std::io::{Read, Write};

/// Maximum header section size (32 KiB)
pub const MAX_HEADER_SIZE: usize = 32 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: String,
    /// Request target as sent, including the query string.
    pub target: String,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    pub fn get(target: &str) -> Self {
        Self {
            method: "GET".to_string(),
            target: target.to_string(),
            headers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, content_type: &str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: vec![("Content-Type".to_string(), content_type.to_string())],
            body: body.into(),
        }
    }

    pub fn text(status: u16, message: &str) -> Self {
        Self::new(status, "text/plain; charset=utf-8", format!("{message}\n"))
    }

    pub fn html(body: String) -> Self {
        Self::new(200, "text/html; charset=utf-8", body)
    }

    pub fn csv(body: String) -> Self {
        Self::new(200, "text/csv; charset=utf-8", body)
    }

    pub fn json(status: u16, value: &impl Serialize) -> Result<Self> {
        Ok(Self::new(status, "application/json", serde_json::to_vec(value)?))
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Reason phrase for the status codes this server emits
fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

/// Read and parse one request head from a stream.
///
/// Returns `None` when the peer closed the connection before sending anything.
pub fn read_request(stream: &mut impl Read) -> Option<Result<HttpRequest>> {
    let mut buf = Vec::with_capacity(1024);
    let mut byte = [0u8; 1];

    loop {
        match stream.read(&mut byte) {
            Ok(0) => {
                if buf.is_empty() {
                    return None;
                }
                return Some(Err(RepoTableError::Http(
                    "Connection closed mid-request".to_string(),
                )));
            }
            Ok(_) => {
                buf.push(byte[0]);
                if buf.len() > MAX_HEADER_SIZE {
                    return Some(Err(RepoTableError::Http("Headers too large".to_string())));
                }
                if buf.ends_with(b"\r\n\r\n") {
                    break;
                }
            }
            Err(e) => {
                if buf.is_empty() {
                    return None;
                }
                return Some(Err(e.into()));
            }
        }
    }

    Some(parse_head(&buf))
}

fn parse_head(buf: &[u8]) -> Result<HttpRequest> {
    let mut parsed_headers = [httparse::EMPTY_HEADER; 64];
    let mut req = httparse::Request::new(&mut parsed_headers);

    match req.parse(buf) {
        Ok(httparse::Status::Complete(_)) => {}
        Ok(httparse::Status::Partial) => {
            return Err(RepoTableError::Http("Incomplete HTTP request".to_string()));
        }
        Err(e) => return Err(RepoTableError::Http(format!("HTTP parse error: {e}"))),
    }

    let headers = req
        .headers
        .iter()
        .map(|h| {
            (
                h.name.to_string(),
                String::from_utf8_lossy(h.value).into_owned(),
            )
        })
        .collect();

    Ok(HttpRequest {
        method: req.method.unwrap_or("").to_string(),
        target: req.path.unwrap_or("/").to_string(),
        headers,
    })
}

/// Write a response and close out the exchange.
pub fn write_response(stream: &mut impl Write, response: &HttpResponse) -> std::io::Result<()> {
    let mut head = format!("HTTP/1.1 {} {}\r\n", response.status, reason(response.status));
    head.push_str(&format!("Content-Length: {}\r\n", response.body.len()));
    head.push_str("Connection: close\r\n");
    for (name, value) in &response.headers {
        head.push_str(&format!("{name}: {value}\r\n"));
    }
    head.push_str("\r\n");

    stream.write_all(head.as_bytes())?;
    stream.write_all(&response.body)?;
    stream.flush()
}
