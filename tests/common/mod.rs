//! Shared utilities for integration testing.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::WebSocketStream;

use rpc_relay::config::RelayConfig;
use rpc_relay::{HttpServer, Shutdown};

/// Start the relay server on `addr` and return the shutdown handle.
#[allow(dead_code)]
pub async fn start_relay(config: RelayConfig, addr: SocketAddr) -> Shutdown {
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    let listener = TcpListener::bind(addr).await.unwrap();
    let rx = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    tokio::time::sleep(Duration::from_millis(200)).await;
    shutdown
}

/// Start a programmable mock HTTP backend.
///
/// The closure receives the request target (path + query) and returns the
/// status code and body to respond with.
#[allow(dead_code)]
pub async fn start_programmable_backend<F, Fut>(addr: SocketAddr, f: F)
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind(addr).await.unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let target = read_request_target(&mut socket).await.unwrap_or_default();
                        let (status, body) = f(target).await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            429 => "429 Too Many Requests",
                            500 => "500 Internal Server Error",
                            502 => "502 Bad Gateway",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });
}

/// Start a backend that accepts connections and drops them without
/// responding, counting each accept. Every request against it fails at the
/// transport level.
#[allow(dead_code)]
pub async fn start_dropping_backend(addr: SocketAddr, attempts: Arc<AtomicU32>) {
    let listener = TcpListener::bind(addr).await.unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    drop(socket);
                }
                Err(_) => break,
            }
        }
    });
}

/// Start a mock WebSocket upstream. The handler runs once per accepted
/// connection.
#[allow(dead_code)]
pub async fn start_ws_upstream<F, Fut>(addr: SocketAddr, handler: F)
where
    F: Fn(WebSocketStream<TcpStream>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(addr).await.unwrap();
    let handler = Arc::new(handler);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((stream, _)) => {
                    let handler = handler.clone();
                    tokio::spawn(async move {
                        if let Ok(ws) = tokio_tungstenite::accept_async(stream).await {
                            handler(ws).await;
                        }
                    });
                }
                Err(_) => break,
            }
        }
    });
}

/// Read the request head and return its target (path + query).
#[allow(dead_code)]
async fn read_request_target(socket: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.windows(4).any(|w| w == b"\r\n\r\n") || buf.len() > 16 * 1024 {
            break;
        }
    }

    let head = String::from_utf8_lossy(&buf);
    let request_line = head.lines().next()?;
    let mut parts = request_line.split_whitespace();
    let _method = parts.next()?;
    parts.next().map(|s| s.to_string())
}
