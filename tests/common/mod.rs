//! Shared test helpers for integration tests.
//!
//! `MockService` stands in for the Better BibTeX JSON-RPC server: it listens on
//! a loopback port, answers every POST with a canned body chosen by the
//! requested citation key, and keeps the request bodies it received. It can
//! also announce a longer body than it sends, then hang up.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

/// Reply body for a key the mock knows nothing about.
pub const EMPTY_REPLY: &str = r#"{"jsonrpc": "2.0", "result": []}"#;

/// Wraps CSL-JSON items into a successful `item.search` reply body.
pub fn search_reply(items: &[&str]) -> String {
    format!(r#"{{"jsonrpc": "2.0", "result": [{}]}}"#, items.join(", "))
}

/// Full CSL-JSON item as Zotero returns it for `smith2020`.
pub const SMITH_2020: &str = r#"{
    "page": "1-10",
    "title": "A Study",
    "container-title": "Journal X",
    "author": [{"family": "Smith", "given": "J"}],
    "issued": {"date-parts": [[2020]]},
    "DOI": "10.1/xyz"
}"#;

/// Minimal item with no authors, container or DOI.
pub const SOLO_1999: &str = r#"{"title": "Solo Work", "issued": {"date-parts": [["1999"]]}}"#;

/// How the mock answers one request.
#[derive(Clone)]
enum Reply {
    /// Complete response with this body
    Body(String),
    /// Announces `declared` bytes of body, sends `body`, then closes
    Truncated { declared: usize, body: String },
}

pub struct MockService {
    /// `host:port` the service listens on
    pub address: String,
    requests: Arc<Mutex<Vec<serde_json::Value>>>,
}

impl MockService {
    /// Starts a service answering each citation key with the given body.
    /// Unknown keys get `EMPTY_REPLY`.
    pub fn start(replies: &[(&str, String)]) -> Self {
        let replies = replies
            .iter()
            .map(|(key, body)| (key.to_string(), Reply::Body(body.clone())))
            .collect();
        Self::spawn(replies, Reply::Body(EMPTY_REPLY.to_string()))
    }

    /// Starts a service whose responses declare a `Content-Length` of
    /// `declared` but carry only `body` before the connection is closed.
    pub fn start_truncated(declared: usize, body: &str) -> Self {
        Self::spawn(
            HashMap::new(),
            Reply::Truncated {
                declared,
                body: body.to_string(),
            },
        )
    }

    fn spawn(replies: HashMap<String, Reply>, fallback: Reply) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap().to_string();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let seen = Arc::clone(&requests);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                handle(stream, &replies, &fallback, &seen);
            }
        });

        Self { address, requests }
    }

    /// JSON bodies of all requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<serde_json::Value> {
        self.requests.lock().unwrap().clone()
    }

    /// Citation keys requested so far, in arrival order.
    pub fn requested_keys(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| r["params"][0].as_str().unwrap_or_default().to_string())
            .collect()
    }
}

fn handle(
    stream: TcpStream,
    replies: &HashMap<String, Reply>,
    fallback: &Reply,
    seen: &Arc<Mutex<Vec<serde_json::Value>>>,
) {
    let mut reader = BufReader::new(stream);
    let mut content_length = 0usize;

    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).unwrap_or(0) == 0 {
            return;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().unwrap_or(0);
            }
        }
    }

    let mut body = vec![0u8; content_length];
    if reader.read_exact(&mut body).is_err() {
        return;
    }

    let request: serde_json::Value = serde_json::from_slice(&body).unwrap_or_default();
    let key = request["params"][0].as_str().unwrap_or_default().to_string();
    seen.lock().unwrap().push(request);

    let (declared, body) = match replies.get(&key).unwrap_or(fallback) {
        Reply::Body(body) => (body.len(), body.as_str()),
        Reply::Truncated { declared, body } => (*declared, body.as_str()),
    };
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        declared, body
    );

    let mut stream = reader.into_inner();
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}
