//! Minimal HTTP/1.1 object server for integration tests.
//!
//! Answers every GET with the same canned response and records the request
//! head it received. Each connection is served once and closed.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Canned {
    pub status: u16,
    pub body: Vec<u8>,
    /// Overrides the `Content-Length` header; `None` sends the real body length.
    pub content_length: Option<u64>,
    pub set_cookie: Option<String>,
}

impl Canned {
    pub fn ok(body: Vec<u8>) -> Self {
        Self {
            status: 200,
            body,
            content_length: None,
            set_cookie: Some("RGWSESSION=stress; Path=/".to_string()),
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: format!("status {}", status).into_bytes(),
            content_length: None,
            set_cookie: None,
        }
    }
}

pub struct ObjectServer {
    base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl ObjectServer {
    /// Start serving `canned` on an ephemeral port. Runs until the process exits.
    pub fn start(canned: Canned) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);
        let canned = Arc::new(canned);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let canned = Arc::clone(&canned);
                let seen = Arc::clone(&seen);
                thread::spawn(move || handle(stream, &canned, &seen));
            }
        });
        Self {
            base_url: format!("http://127.0.0.1:{}", port),
            requests,
        }
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Raw request heads received so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// Request paths received so far.
    pub fn paths(&self) -> Vec<String> {
        self.requests()
            .iter()
            .filter_map(|head| head.split_whitespace().nth(1).map(str::to_string))
            .collect()
    }
}

/// A URL on 127.0.0.1 where nothing listens.
pub fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/AG100.003/none.h5", port)
}

fn handle(mut stream: TcpStream, canned: &Canned, seen: &Mutex<Vec<String>>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));

    let mut head = Vec::new();
    let mut buf = [0u8; 4096];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return,
            Ok(n) => head.extend_from_slice(&buf[..n]),
        }
    }
    seen.lock()
        .unwrap()
        .push(String::from_utf8_lossy(&head).into_owned());

    let content_length = canned.content_length.unwrap_or(canned.body.len() as u64);
    let cookie = canned
        .set_cookie
        .as_ref()
        .map(|c| format!("Set-Cookie: {}\r\n", c))
        .unwrap_or_default();
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n",
        canned.status,
        reason(canned.status),
        content_length,
        cookie
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.write_all(&canned.body);
    let _ = stream.flush();
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}
