//! Main HTTP Gateway Server.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument};

use exfil_sink_core::{UploadStore, DEFAULT_FILENAME};

use crate::upload::{receive_upload, GatewayState};

/// Port the fixture listens on unless told otherwise.
pub const DEFAULT_PORT: u16 = 8089;

/// Everything the server needs, passed in explicitly rather than read from
/// the process environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    /// Directory uploads are written into.
    pub upload_dir: PathBuf,
    pub default_filename: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            upload_dir: PathBuf::from("."),
            default_filename: DEFAULT_FILENAME.to_string(),
        }
    }
}

/// Build the router. Every path and method is routed to the upload handler,
/// which rejects anything but `POST` itself.
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .fallback(receive_upload)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// A bound upload server. Runs until the process is terminated.
pub struct UploadServer {
    config: ServerConfig,
    listener: TcpListener,
}

impl UploadServer {
    /// Bind the listening socket.
    pub async fn bind(config: ServerConfig) -> Result<Self> {
        let addr = format!("{}:{}", config.bind_address, config.port);
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;
        Ok(Self { config, listener })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections until the process exits.
    #[instrument(skip(self), fields(upload_dir = %self.config.upload_dir.display()))]
    pub async fn serve(self) -> Result<()> {
        let addr = self.local_addr()?;
        let state = GatewayState::new(
            UploadStore::new(self.config.upload_dir.clone()),
            self.config.default_filename.as_str(),
        );

        info!(%addr, "Starting server on port {}...", addr.port());
        axum::serve(self.listener, build_router(state)).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    async fn spawn_server(dir: &TempDir) -> SocketAddr {
        let server = UploadServer::bind(ServerConfig {
            bind_address: "127.0.0.1".to_string(),
            port: 0,
            upload_dir: dir.path().to_path_buf(),
            ..Default::default()
        })
        .await
        .unwrap();
        let addr = server.local_addr().unwrap();
        tokio::spawn(server.serve());
        addr
    }

    /// Write a raw request and read until the server closes the connection.
    async fn raw_exchange(addr: SocketAddr, request: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = Vec::new();
        let mut buf = [0u8; 1024];
        // A reset after the reply counts as the end of the exchange.
        while let Ok(n) = stream.read(&mut buf).await {
            if n == 0 {
                break;
            }
            response.extend_from_slice(&buf[..n]);
        }
        String::from_utf8_lossy(&response).into_owned()
    }

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_address, "0.0.0.0");
        assert_eq!(config.port, 8089);
        assert_eq!(config.upload_dir, PathBuf::from("."));
        assert_eq!(config.default_filename, "uploaded_file");
    }

    #[tokio::test]
    async fn test_upload_over_tcp() {
        let dir = TempDir::new().unwrap();
        let addr = spawn_server(&dir).await;

        let response = reqwest::Client::new()
            .post(format!("http://{addr}/"))
            .header("filename", "report.bin")
            .body(vec![0x01, 0x02, 0x03])
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert_eq!(response.text().await.unwrap(), "File received successfully.");
        assert_eq!(
            std::fs::read(dir.path().join("report.bin")).unwrap(),
            vec![0x01, 0x02, 0x03]
        );
    }

    #[tokio::test]
    async fn test_large_upload_over_tcp() {
        let dir = TempDir::new().unwrap();
        let addr = spawn_server(&dir).await;
        let payload: Vec<u8> = (0..3 * 1024 * 1024).map(|i| (i % 251) as u8).collect();

        let response = reqwest::Client::new()
            .post(format!("http://{addr}/upload"))
            .body(payload.clone())
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let written = std::fs::read(dir.path().join("uploaded_file")).unwrap();
        assert_eq!(written.len(), payload.len());
        assert!(written == payload);
    }

    #[tokio::test]
    async fn test_non_numeric_content_length_over_tcp_is_rejected_by_hyper() {
        let dir = TempDir::new().unwrap();
        let addr = spawn_server(&dir).await;

        let response = raw_exchange(
            addr,
            "POST / HTTP/1.1\r\nHost: localhost\r\nContent-Length: abc\r\nfilename: bad.bin\r\nConnection: close\r\n\r\n",
        )
        .await;

        // The connection layer answers before the handler runs: 400, empty body.
        assert!(response.starts_with("HTTP/1.1 400"), "{response}");
        assert!(response.to_ascii_lowercase().contains("content-length: 0"), "{response}");
        assert!(response.ends_with("\r\n\r\n"), "{response}");
        assert!(!dir.path().join("bad.bin").exists());
    }

    #[tokio::test]
    async fn test_missing_content_length_over_tcp() {
        let dir = TempDir::new().unwrap();
        let addr = spawn_server(&dir).await;

        let response = raw_exchange(
            addr,
            "POST / HTTP/1.1\r\nHost: localhost\r\nfilename: none.bin\r\nConnection: close\r\n\r\n",
        )
        .await;

        assert!(response.starts_with("HTTP/1.1 400"), "{response}");
        assert!(response.ends_with("Missing Content-Length header."), "{response}");
        assert!(!dir.path().join("none.bin").exists());
    }
}
