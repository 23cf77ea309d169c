//! # Feature: Keep Alive
//!
//! HTTP endpoint the hosting platform polls to confirm the process is up.
//! Every request gets `200 OK` with a static body, whatever the path.
//!
//! - **Version**: 2.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 2.0.0: Served by an axum router with graceful shutdown
//! - 1.0.0: Static response on every connection

use anyhow::{Context, Result};
use axum::routing::get;
use axum::Router;
use log::{error, info};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::watch;

pub const RESPONSE_BODY: &str = "Bot is active and running!";

pub struct KeepAliveServer {
    listener: TcpListener,
}

impl KeepAliveServer {
    /// Bind on all interfaces
    pub async fn bind(port: u16) -> Result<Self> {
        Self::bind_addr(SocketAddr::from(([0, 0, 0, 0], port))).await
    }

    pub async fn bind_addr(addr: SocketAddr) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("binding keep-alive server on {addr}"))?;
        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until `shutdown` flips to `true` or its sender is dropped
    pub async fn serve(self, shutdown: watch::Receiver<bool>) {
        if let Ok(addr) = self.listener.local_addr() {
            info!("🌍 Keep-alive server listening on http://{addr}");
        }

        if let Err(e) = axum::serve(self.listener, router())
            .with_graceful_shutdown(shutdown_requested(shutdown))
            .await
        {
            error!("Keep-alive server failed: {e}");
        }

        info!("Keep-alive server stopped");
    }
}

fn router() -> Router {
    Router::new().route("/", get(alive)).fallback(alive)
}

async fn alive() -> &'static str {
    RESPONSE_BODY
}

async fn shutdown_requested(mut shutdown: watch::Receiver<bool>) {
    while !*shutdown.borrow_and_update() {
        if shutdown.changed().await.is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    async fn http_get(addr: SocketAddr, path: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(
                format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
                    .as_bytes(),
            )
            .await
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    async fn start() -> (SocketAddr, watch::Sender<bool>, tokio::task::JoinHandle<()>) {
        let server = KeepAliveServer::bind_addr(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .unwrap();
        let addr = server.local_addr().unwrap();
        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(server.serve(rx));
        (addr, tx, handle)
    }

    #[tokio::test]
    async fn test_responds_ok_to_any_path() {
        let (addr, tx, handle) = start().await;

        for path in ["/", "/health", "/anything/else"] {
            let response = http_get(addr, path).await;
            assert!(response.starts_with("HTTP/1.1 200 OK\r\n"), "{path}: {response}");
            assert!(response.contains("text/plain; charset=utf-8"));
            assert!(response.ends_with(RESPONSE_BODY));
        }

        tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("server did not stop")
            .unwrap();
    }

    #[tokio::test]
    async fn test_stops_when_shutdown_sender_dropped() {
        let (_addr, tx, handle) = start().await;
        drop(tx);
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("server did not stop")
            .unwrap();
    }

    #[tokio::test]
    async fn test_bind_conflict_is_an_error() {
        let first = KeepAliveServer::bind_addr(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .unwrap();
        let taken = first.local_addr().unwrap();
        assert!(KeepAliveServer::bind_addr(taken).await.is_err());
    }
}
