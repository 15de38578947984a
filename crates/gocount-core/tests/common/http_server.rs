//! Minimal HTTP/1.1 server for integration tests.
//!
//! Routes by path: `/go` serves a page with four "Go" tokens,
//! `/bad` answers 400, `/slow` sleeps before answering, anything else serves
//! `Hello, gopher`.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

pub const GO_PAGE: &str = "<html><body>Go. Gophers. ConGo, gophra. Go language</body></html>";
pub const DEFAULT_PAGE: &str = "Hello, gopher";

/// Requests to `/slow` currently being served, and the most seen at once.
#[derive(Debug, Default)]
pub struct SlowStats {
    active: AtomicUsize,
    peak: AtomicUsize,
}

impl SlowStats {
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    fn enter(&self) {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn leave(&self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Starts a server in a background thread. Returns the base URL without a
/// trailing slash (e.g. "http://127.0.0.1:12345"). Runs until the process exits.
pub fn start() -> String {
    start_tracked().0
}

/// Like `start`, also returning the `/slow` concurrency stats.
pub fn start_tracked() -> (String, Arc<SlowStats>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let stats = Arc::new(SlowStats::default());
    let server_stats = Arc::clone(&stats);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let stats = Arc::clone(&server_stats);
            thread::spawn(move || handle(stream, &stats));
        }
    });
    (format!("http://127.0.0.1:{}", port), stats)
}

fn handle(mut stream: std::net::TcpStream, stats: &SlowStats) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let path = request_path(request);
    let (status, body) = match path {
        "/go" => ("200 OK", GO_PAGE),
        "/bad" => ("400 Bad Request", ""),
        "/slow" => {
            stats.enter();
            thread::sleep(Duration::from_millis(250));
            stats.leave();
            ("200 OK", "Go slow")
        }
        _ => ("200 OK", DEFAULT_PAGE),
    };
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
}

/// Path of the request line (`GET /go HTTP/1.1` → `/go`).
fn request_path(request: &str) -> &str {
    request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
}
