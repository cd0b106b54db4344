//! Shared utilities for integration testing: mock target services and a
//! fake controller that the bridge dials into.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use tunnel_bridge::bridge::SessionSummary;
use tunnel_bridge::config::BridgeConfig;
use tunnel_bridge::lifecycle::startup::{self, StartupError};
use tunnel_bridge::Shutdown;

/// A request as seen by the mock target service.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RecordedRequest {
    pub fn header_values(&self, name: &str) -> Vec<String> {
        self.headers
            .get_all(name)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }
}

async fn record(
    State(tx): State<mpsc::UnboundedSender<RecordedRequest>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    let _ = tx.send(RecordedRequest {
        method,
        uri,
        headers,
        body,
    });

    match path.as_str() {
        "/missing" => (StatusCode::NOT_FOUND, "nope").into_response(),
        "/broken" => (StatusCode::INTERNAL_SERVER_ERROR, "<b>boom</b>").into_response(),
        "/binary" => (StatusCode::OK, vec![0xffu8, 0x00, 0xfe]).into_response(),
        "/large" => (StatusCode::OK, "x".repeat(4096)).into_response(),
        _ => (StatusCode::OK, [("x-seen", "yes")], "ok").into_response(),
    }
}

/// Start a target service that records every request it receives.
pub async fn start_recording_target() -> (SocketAddr, mpsc::UnboundedReceiver<RecordedRequest>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let app = Router::new().fallback(record).with_state(tx);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, rx)
}

/// Start a raw target that answers every connection with a fixed response
/// and reports the request line it saw.
pub async fn start_raw_target(
    response: impl Into<String>,
) -> (SocketAddr, mpsc::UnboundedReceiver<String>) {
    let response: Arc<str> = response.into().into();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        loop {
            let Ok((socket, _)) = listener.accept().await else {
                break;
            };
            let tx = tx.clone();
            let response = Arc::clone(&response);
            tokio::spawn(async move {
                let (read, mut write) = socket.into_split();
                let mut reader = BufReader::new(read);

                let mut request_line = String::new();
                let _ = reader.read_line(&mut request_line).await;
                let _ = tx.send(request_line.trim_end().to_string());

                // Drain the rest of the request head.
                let mut line = String::new();
                loop {
                    line.clear();
                    match reader.read_line(&mut line).await {
                        Ok(0) | Err(_) => break,
                        Ok(_) if line == "\r\n" => break,
                        Ok(_) => {}
                    }
                }

                let _ = write.write_all(response.as_bytes()).await;
                let _ = write.shutdown().await;
                tokio::time::sleep(Duration::from_millis(10)).await;
            });
        }
    });

    (addr, rx)
}

/// The controller end of a bridge session.
pub struct Controller {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
    pub shutdown: Arc<Shutdown>,
    pub session: JoinHandle<Result<SessionSummary, StartupError>>,
}

impl Controller {
    pub async fn send(&mut self, frame: &str) {
        self.writer.write_all(frame.as_bytes()).await.unwrap();
        self.writer.write_all(b"\n").await.unwrap();
    }

    pub async fn recv(&mut self) -> String {
        tokio::time::timeout(Duration::from_secs(10), self.lines.next_line())
            .await
            .expect("timed out waiting for reply frame")
            .unwrap()
            .expect("bridge closed the connection")
    }

    /// Close the controller side and wait for the bridge to finish.
    pub async fn close(mut self) -> Result<SessionSummary, StartupError> {
        self.writer.shutdown().await.unwrap();
        let mut rest = Vec::new();
        let _ = self.lines.into_inner().read_to_end(&mut rest).await;
        self.session.await.unwrap()
    }
}

/// Bridge configuration pointing at `base_address`; controller filled in by
/// [`start_session`].
pub fn config_for(base_address: &str) -> BridgeConfig {
    let mut config = BridgeConfig::default();
    config.target.base_address = base_address.to_string();
    config.target.use_env_proxy = false;
    config
}

/// Listen as the controller, start the bridge, and accept its connection.
pub async fn start_session(mut config: BridgeConfig) -> Controller {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    config.controller.address = listener.local_addr().unwrap().to_string();

    let shutdown = Arc::new(Shutdown::new());
    let session = tokio::spawn(startup::run(config, shutdown.subscribe()));

    let (stream, _) = tokio::time::timeout(Duration::from_secs(10), listener.accept())
        .await
        .expect("bridge never connected")
        .unwrap();
    let (read, writer) = stream.into_split();

    Controller {
        lines: BufReader::new(read).lines(),
        writer,
        shutdown,
        session,
    }
}
