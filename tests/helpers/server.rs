//! A throwaway HTTP server that answers a fixed number of requests.
//!
//! Each connection gets one canned response with `Connection: close`, so the
//! client never reuses a socket. Once every response is sent the listener is
//! dropped and further connections are refused, which is how tests simulate
//! the content API going down.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Status line and JSON body for one request
#[derive(Debug, Clone)]
pub struct CannedResponse {
    pub status: u16,
    pub body: String,
}

impl CannedResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Running server; `finish` returns the raw request heads it received
pub struct ContentServer {
    pub url: String,
    handle: JoinHandle<Vec<String>>,
}

impl ContentServer {
    /// Starts serving `responses` in order, one per connection
    pub async fn start(responses: Vec<CannedResponse>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let url = format!("http://{}/v2024-08-01/data/query/production", addr);

        let handle = tokio::spawn(async move {
            let mut requests = Vec::new();
            for response in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                requests.push(read_head(&mut socket).await);

                let reply = format!(
                    "HTTP/1.1 {} Canned\r\n\
                     Content-Type: application/json\r\n\
                     Content-Length: {}\r\n\
                     Connection: close\r\n\r\n{}",
                    response.status,
                    response.body.len(),
                    response.body
                );
                socket.write_all(reply.as_bytes()).await.unwrap();
                socket.shutdown().await.unwrap();
            }
            requests
        });

        Self { url, handle }
    }

    /// Waits until every canned response is sent and the listener is closed
    pub async fn finish(self) -> Vec<String> {
        self.handle.await.unwrap()
    }
}

async fn read_head(socket: &mut tokio::net::TcpStream) -> String {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut buf).await.unwrap();
        if n == 0 {
            break;
        }
        head.extend_from_slice(&buf[..n]);
    }
    String::from_utf8_lossy(&head).into_owned()
}
