//! In-process stand-in for the appliance's content upload endpoint.
//!
//! Speaks just enough HTTP/1.1 for one request per connection and keeps a
//! single file's upload state in memory.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use aerofs_api::ContentRange;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// One request as the appliance saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    /// Header names lower-cased, in arrival order.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn all(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct State {
    /// Current version of the file.
    pub etag: String,
    pub upload_id: Option<String>,
    sessions: usize,
    /// Bytes durably received for the open session.
    pub content: Vec<u8>,
    pub completed: Option<u64>,
    /// `Content-Range` of every request since the last session opened.
    pub ranges: Vec<String>,
    pub requests: Vec<Recorded>,
    /// Zero-based index of a chunk request (counted since the session
    /// opened) to reject with 503 without storing it.
    pub fail_chunk: Option<usize>,
    chunks_seen: usize,
    /// Raw `Range` value to answer committed-bytes queries with instead of the count.
    pub committed_reply: Option<String>,
}

pub struct MockAppliance {
    pub base_url: String,
    pub state: Arc<Mutex<State>>,
    handle: JoinHandle<()>,
}

impl MockAppliance {
    pub async fn start(etag: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let state = Arc::new(Mutex::new(State {
            etag: etag.to_string(),
            ..State::default()
        }));

        let shared = Arc::clone(&state);
        let handle = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let shared = Arc::clone(&shared);
                tokio::spawn(async move {
                    serve(stream, shared).await;
                });
            }
        });

        Self {
            base_url: format!("http://127.0.0.1:{port}/api/v1.3/"),
            state,
            handle,
        }
    }

    pub fn client(&self) -> aerofs_api::Client {
        let config = aerofs_api::ClientConfig::with_base_url(&self.base_url, "test-token").unwrap();
        aerofs_api::Client::new(config).unwrap()
    }

    pub fn content(&self) -> Vec<u8> {
        self.state.lock().unwrap().content.clone()
    }

    pub fn ranges(&self) -> Vec<String> {
        self.state.lock().unwrap().ranges.clone()
    }

    pub fn completed(&self) -> Option<u64> {
        self.state.lock().unwrap().completed
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn fail_chunk(&self, index: usize) {
        self.state.lock().unwrap().fail_chunk = Some(index);
    }

    pub fn heal(&self) {
        self.state.lock().unwrap().fail_chunk = None;
    }

    pub fn reply_to_query_with(&self, value: &str) {
        self.state.lock().unwrap().committed_reply = Some(value.to_string());
    }
}

impl Drop for MockAppliance {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn serve(mut stream: TcpStream, state: Arc<Mutex<State>>) {
    let Some(request) = read_request(&mut stream).await else {
        return;
    };
    let (status, headers) = {
        let mut state = state.lock().unwrap();
        state.requests.push(request.clone());
        handle(&mut state, &request)
    };

    let mut resp = format!("HTTP/1.1 {status} Mock\r\n");
    for (name, value) in headers {
        resp.push_str(&format!("{name}: {value}\r\n"));
    }
    resp.push_str("Content-Length: 0\r\nConnection: close\r\n\r\n");
    let _ = stream.write_all(resp.as_bytes()).await;
    let _ = stream.shutdown().await;
}

async fn read_request(stream: &mut TcpStream) -> Option<Recorded> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 8192];
    let head_end = loop {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).into_owned();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split(' ');
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|l| l.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();

    let length = headers
        .iter()
        .find(|(k, _)| k == "content-length")
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = buf[head_end + 4..].to_vec();
    while body.len() < length {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }

    Some(Recorded {
        method,
        path,
        headers,
        body,
    })
}

fn handle(state: &mut State, req: &Recorded) -> (u16, Vec<(String, String)>) {
    if req.method != "PUT" || !req.path.ends_with("/content") {
        return (404, vec![]);
    }
    let Some(range) = req.header("content-range").map(str::to_string) else {
        return (400, vec![]);
    };
    let parsed: ContentRange = match range.parse() {
        Ok(parsed) => parsed,
        Err(_) => return (400, vec![]),
    };

    if parsed == ContentRange::Open {
        let tags = req.all("if-match");
        if !tags.is_empty() && !tags.contains(&state.etag.as_str()) {
            return (412, vec![]);
        }
        state.sessions += 1;
        let id = format!("upload-{}", state.sessions);
        state.upload_id = Some(id.clone());
        state.content.clear();
        state.completed = None;
        state.ranges = vec![range];
        state.chunks_seen = 0;
        return (200, vec![("Upload-ID".into(), id)]);
    }

    if req.header("upload-id") != state.upload_id.as_deref() {
        return (400, vec![]);
    }
    state.ranges.push(range);

    if parsed == ContentRange::Query {
        let value = state
            .committed_reply
            .clone()
            .unwrap_or_else(|| state.content.len().to_string());
        return (200, vec![("Range".into(), value)]);
    }

    let index = state.chunks_seen;
    state.chunks_seen += 1;
    if state.fail_chunk == Some(index) {
        return (503, vec![]);
    }

    let held = state.content.len() as u64;
    match parsed {
        ContentRange::Partial(r) | ContentRange::Final { range: r, .. } => {
            if r.start() != held || r.len() != req.body.len() as u64 {
                return (416, vec![]);
            }
            state.content.extend_from_slice(&req.body);
        }
        ContentRange::Empty { total } => {
            if total != held || !req.body.is_empty() {
                return (416, vec![]);
            }
        }
        ContentRange::Open | ContentRange::Query => unreachable!(),
    }

    if let Some(total) = parsed.total() {
        state.completed = Some(total);
        state.etag = format!("\"v{}\"", state.sessions + 1);
        return (200, vec![("ETag".into(), state.etag.clone())]);
    }
    (200, vec![])
}
