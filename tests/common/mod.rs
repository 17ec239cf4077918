//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use external_proxy::config::ProxyConfig;
use external_proxy::fetch::{FetchPolicy, Fetcher, RemoteFetch};
use external_proxy::ProxyServer;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// A canned upstream response.
#[derive(Clone)]
pub struct MockResponse {
    status: &'static str,
    content_type: Option<&'static str>,
    body: Vec<u8>,
    delay: Duration,
    chunked: bool,
}

impl MockResponse {
    pub fn ok(content_type: &'static str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: "200 OK",
            content_type: Some(content_type),
            body: body.into(),
            delay: Duration::ZERO,
            chunked: false,
        }
    }

    pub fn status(mut self, status: &'static str) -> Self {
        self.status = status;
        self
    }

    pub fn without_content_type(mut self) -> Self {
        self.content_type = None;
        self
    }

    /// Send the body with chunked transfer encoding and no Content-Length.
    ///
    /// The first chunk is flushed on its own before the rest follow.
    pub fn chunked(mut self) -> Self {
        self.chunked = true;
        self
    }

    /// Wait this long after reading the request before answering.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Request targets seen by a mock backend, in arrival order.
pub type SeenRequests = Arc<Mutex<Vec<String>>>;

/// Start a mock backend that answers every request with `response`.
///
/// Returns the bound address and the request targets it has received.
pub async fn start_mock_backend(response: MockResponse) -> (SocketAddr, SeenRequests) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen: SeenRequests = Arc::new(Mutex::new(Vec::new()));
    let seen_by_task = Arc::clone(&seen);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let response = response.clone();
                    let seen = Arc::clone(&seen_by_task);
                    tokio::spawn(async move {
                        let target = read_request_target(&mut socket).await;
                        seen.lock().unwrap().push(target);
                        tokio::time::sleep(response.delay).await;

                        let _ = write_response(&mut socket, &response).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, seen)
}

/// Chunk size used by [`MockResponse::chunked`].
const CHUNK_SIZE: usize = 8;

async fn write_response(
    socket: &mut tokio::net::TcpStream,
    response: &MockResponse,
) -> std::io::Result<()> {
    let mut head = format!("HTTP/1.1 {}\r\nConnection: close\r\n", response.status);
    if response.chunked {
        head.push_str("Transfer-Encoding: chunked\r\n");
    } else {
        head.push_str(&format!("Content-Length: {}\r\n", response.body.len()));
    }
    if let Some(content_type) = response.content_type {
        head.push_str(&format!("Content-Type: {content_type}\r\n"));
    }
    head.push_str("\r\n");
    socket.write_all(head.as_bytes()).await?;

    if !response.chunked {
        return socket.write_all(&response.body).await;
    }

    for (i, chunk) in response.body.chunks(CHUNK_SIZE).enumerate() {
        socket
            .write_all(format!("{:x}\r\n", chunk.len()).as_bytes())
            .await?;
        socket.write_all(chunk).await?;
        socket.write_all(b"\r\n").await?;
        if i == 0 {
            socket.flush().await?;
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }
    socket.write_all(b"0\r\n\r\n").await
}

/// Read the request head and return the request target from its first line.
async fn read_request_target(socket: &mut tokio::net::TcpStream) -> String {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => head.extend_from_slice(&buf[..n]),
        }
    }
    String::from_utf8_lossy(&head)
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or_default()
        .to_string()
}

/// Start a proxy on an ephemeral loopback port.
pub async fn start_proxy(config: ProxyConfig) -> (SocketAddr, Arc<ProxyServer>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let remote = RemoteFetch::with_client(client(), FetchPolicy::from(&config.fetch));
    let server = Arc::new(ProxyServer::with_fetcher(config.listener, Fetcher::new(remote)));

    let serving = Arc::clone(&server);
    tokio::spawn(async move {
        let _ = serving.serve_on(listener).await;
    });

    (addr, server)
}

/// Path for a locator: `/<base64>/<name>`.
///
/// Panics if the encoding contains `/`, which would add a path segment.
pub fn proxy_path(locator: &str, name: &str) -> String {
    let encoded = STANDARD.encode(locator);
    assert!(!encoded.contains('/'), "{locator:?} encodes with a '/'");
    format!("/{encoded}/{name}")
}

/// Spell a loopback upstream URL so that its base64 form has no `/`.
///
/// Userinfo and alternate IPv4 spellings shift the base64 alignment; all of
/// them resolve to 127.0.0.1.
pub fn path_safe_url(addr: SocketAddr, path: &str) -> String {
    const USERINFO: [&str; 3] = ["", "u@", "us@"];
    const HOSTS: [&str; 4] = ["127.0.0.1", "127.1", "127.0.1", "2130706433"];

    USERINFO
        .iter()
        .flat_map(|userinfo| {
            HOSTS
                .iter()
                .map(move |host| format!("http://{userinfo}{host}:{}{path}", addr.port()))
        })
        .find(|candidate| !STANDARD.encode(candidate).contains('/'))
        .expect("no path-safe spelling of the upstream url")
}

/// Log output captured in memory, for use as a `fmt` subscriber writer.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// A client that never goes through an environment proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
