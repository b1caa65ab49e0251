//! Minimal HTTP/1.1 server for end-to-end tests.
//!
//! Serves an index page and archive bodies from a route table that can be
//! changed while the server runs. HEAD and GET behaviour is scriptable per
//! route, and every request is logged so tests can assert which calls were
//! (not) made.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadMode {
    /// Answer with the body length.
    Length,
    /// Answer 200 without a `Content-Length` header.
    NoLength,
    Status(u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GetMode {
    Full,
    /// Declare the full length but close the connection after this many bytes.
    Truncate(usize),
    Status(u16),
}

#[derive(Debug, Clone)]
pub struct Route {
    pub body: Vec<u8>,
    pub content_type: &'static str,
    pub head: HeadMode,
    pub get: GetMode,
}

impl Route {
    pub fn archive(len: usize) -> Self {
        Self {
            body: (0..len).map(|i| (i % 251) as u8).collect(),
            content_type: "application/octet-stream",
            head: HeadMode::Length,
            get: GetMode::Full,
        }
    }

    pub fn html(body: impl Into<String>) -> Self {
        Self {
            body: body.into().into_bytes(),
            content_type: "text/html; charset=utf-8",
            head: HeadMode::Length,
            get: GetMode::Full,
        }
    }

    pub fn with_head(mut self, head: HeadMode) -> Self {
        self.head = head;
        self
    }

    pub fn with_get(mut self, get: GetMode) -> Self {
        self.get = get;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedRequest {
    pub method: String,
    pub path: String,
}

type Routes = Arc<Mutex<HashMap<String, Route>>>;
type RequestLog = Arc<Mutex<Vec<LoggedRequest>>>;

pub struct TestServer {
    base: String,
    routes: Routes,
    log: RequestLog,
}

impl TestServer {
    /// Starts the server on an ephemeral port. It runs until the process
    /// exits.
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let routes: Routes = Arc::default();
        let log: RequestLog = Arc::default();

        let (thread_routes, thread_log) = (Arc::clone(&routes), Arc::clone(&log));
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let routes = Arc::clone(&thread_routes);
                let log = Arc::clone(&thread_log);
                thread::spawn(move || handle(stream, &routes, &log));
            }
        });

        Self {
            base: format!("http://127.0.0.1:{}", port),
            routes,
            log,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn serve(&self, path: &str, route: Route) {
        self.routes.lock().unwrap().insert(path.to_string(), route);
    }

    /// Serves an HTML page at `path` with one anchor per href.
    pub fn serve_index(&self, path: &str, hrefs: &[&str]) {
        let anchors: String = hrefs
            .iter()
            .map(|href| format!("    <li><a href=\"{href}\">{href}</a></li>\n"))
            .collect();
        let page = format!(
            "<!DOCTYPE html>\n<html><head><title>Index</title></head><body>\n<ul>\n{anchors}</ul>\n</body></html>\n"
        );
        self.serve(path, Route::html(page));
    }

    pub fn body(&self, path: &str) -> Vec<u8> {
        self.routes.lock().unwrap()[path].body.clone()
    }

    pub fn requests(&self) -> Vec<LoggedRequest> {
        self.log.lock().unwrap().clone()
    }

    pub fn count(&self, method: &str, path: &str) -> usize {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    pub fn clear_log(&self) {
        self.log.lock().unwrap().clear();
    }
}

fn handle(mut stream: TcpStream, routes: &Routes, log: &RequestLog) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));

    let Some(request) = read_head(&mut stream) else {
        return;
    };
    let mut request_line = request.lines().next().unwrap_or("").split_whitespace();
    let method = request_line.next().unwrap_or("").to_string();
    let path = request_line.next().unwrap_or("").to_string();
    log.lock().unwrap().push(LoggedRequest {
        method: method.clone(),
        path: path.clone(),
    });

    let route = routes.lock().unwrap().get(&path).cloned();
    let Some(route) = route else {
        let _ = stream.write_all(status_only(404).as_bytes());
        return;
    };

    if method.eq_ignore_ascii_case("HEAD") {
        let response = match route.head {
            HeadMode::Length => headers(200, route.content_type, Some(route.body.len())),
            HeadMode::NoLength => headers(200, route.content_type, None),
            HeadMode::Status(status) => status_only(status),
        };
        let _ = stream.write_all(response.as_bytes());
        return;
    }

    if method.eq_ignore_ascii_case("GET") {
        let (response, body) = match route.get {
            GetMode::Full => (
                headers(200, route.content_type, Some(route.body.len())),
                &route.body[..],
            ),
            GetMode::Truncate(sent) => (
                headers(200, route.content_type, Some(route.body.len())),
                &route.body[..sent.min(route.body.len())],
            ),
            GetMode::Status(status) => (status_only(status), &route.body[0..0]),
        };
        let _ = stream.write_all(response.as_bytes());
        let _ = stream.write_all(body);
        let _ = stream.flush();
        return;
    }

    let _ = stream.write_all(status_only(405).as_bytes());
}

/// Reads until the end of the request headers.
fn read_head(stream: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => return None,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
        if buf.len() > 64 * 1024 {
            return None;
        }
    }
    String::from_utf8(buf).ok()
}

fn headers(status: u16, content_type: &str, content_length: Option<usize>) -> String {
    let length = content_length
        .map(|len| format!("Content-Length: {}\r\n", len))
        .unwrap_or_default();
    format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\n{}Connection: close\r\n\r\n",
        status,
        reason(status),
        content_type,
        length
    )
}

fn status_only(status: u16) -> String {
    format!(
        "HTTP/1.1 {} {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        status,
        reason(status)
    )
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}
