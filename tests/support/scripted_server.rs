//! One-shot TCP server that replies with raw, pre-chunked bytes.
//!
//! wiremock always answers with a well-formed response in whatever segments
//! hyper chooses. This server lets tests control exactly how the response is
//! split across writes, and send malformed responses.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub struct ScriptedServer {
    pub port: u16,
    handle: JoinHandle<Vec<u8>>,
}

impl ScriptedServer {
    /// Accepts one connection, reads the request header, then writes each
    /// chunk with a short pause in between and closes the connection.
    pub async fn start(chunks: Vec<Vec<u8>>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind scripted server");
        let port = listener.local_addr().expect("local addr").port();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let mut request = Vec::new();
            let mut buf = [0_u8; 512];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.expect("read request");
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            for chunk in chunks {
                // The client may hang up early on a rejected header.
                if socket.write_all(&chunk).await.is_err() || socket.flush().await.is_err() {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
            let _ = socket.shutdown().await;
            request
        });

        Self { port, handle }
    }

    /// Splits `response` into pieces of `size` bytes.
    pub async fn start_chunked(response: &[u8], size: usize) -> Self {
        Self::start(response.chunks(size).map(<[u8]>::to_vec).collect()).await
    }

    /// The raw request the client sent.
    pub async fn request(self) -> Vec<u8> {
        self.handle.await.expect("scripted server task")
    }
}
