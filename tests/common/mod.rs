#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use reqwest::{Client, StatusCode, header::HeaderMap};
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use fixture_server::{FixtureServer, ServerConfig};

pub struct TestServer {
    pub handle: JoinHandle<Result<(), anyhow::Error>>,
    pub shutdown_tx: watch::Sender<bool>,
    pub addr: SocketAddr,
    pub url: String,
}

impl TestServer {
    pub async fn shutdown(self) -> Result<()> {
        let _ = self.shutdown_tx.send(true);
        self.handle.abort();
        let _ = self.handle.await;
        Ok(())
    }
}

pub struct TestFixture {
    pub server: TestServer,
    pub data_dir: TempDir,
    pub uploads_dir: PathBuf,
}

impl TestFixture {
    pub async fn new() -> Result<Self> {
        Self::with_config(|config| config).await
    }

    pub async fn with_latency(latency_ms: u64) -> Result<Self> {
        Self::with_config(|config| config.with_latency(Duration::from_millis(latency_ms))).await
    }

    pub async fn with_config<F>(configure: F) -> Result<Self>
    where
        F: FnOnce(ServerConfig) -> ServerConfig,
    {
        let data_dir = TempDir::new()?;
        let uploads_dir = data_dir.path().join("uploads");

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let url = format!("http://{}", addr);

        let config = configure(ServerConfig::new(&uploads_dir).with_listen(addr));

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(async move {
            FixtureServer::new(config)
                .serve_with_listener(listener, async move {
                    let _ = shutdown_rx.changed().await;
                })
                .await
        });

        let server = TestServer {
            handle,
            shutdown_tx,
            addr,
            url,
        };

        let fixture = TestFixture {
            server,
            data_dir,
            uploads_dir,
        };
        fixture.wait_ready().await?;

        Ok(fixture)
    }

    /// The uploads directory is created by the server on startup.
    async fn wait_ready(&self) -> Result<()> {
        let uploads_dir = self.uploads_dir.clone();
        wait_until(3000, || {
            let ready = uploads_dir.is_dir();
            async move { Ok(ready) }
        })
        .await
    }

    pub fn url(&self) -> &str {
        &self.server.url
    }

    pub fn uploads(&self) -> &Path {
        &self.uploads_dir
    }

    pub async fn shutdown(self) -> Result<()> {
        self.server.shutdown().await
    }
}

// HTTP client utilities
pub async fn put_bytes(
    client: &Client,
    base_url: &str,
    path: &str,
    bytes: impl Into<reqwest::Body>,
) -> Result<(StatusCode, HeaderMap, String)> {
    let url = format!("{}{}", base_url, path);
    let resp = client.put(url).body(bytes).send().await?;

    let status = resp.status();
    let headers = resp.headers().clone();
    let text = resp.text().await?;

    Ok((status, headers, text))
}

pub async fn get_bytes(
    client: &Client,
    base_url: &str,
    path: &str,
) -> Result<(StatusCode, HeaderMap, Vec<u8>)> {
    let url = format!("{}{}", base_url, path);
    let resp = client.get(url).send().await?;

    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = resp.bytes().await?.to_vec();

    Ok((status, headers, bytes))
}

pub fn content_type(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
}

// Utility functions
pub async fn wait_until<F, Fut>(timeout_ms: u64, mut check_fn: F) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<bool>>,
{
    let start = std::time::Instant::now();
    let timeout_duration = Duration::from_millis(timeout_ms);

    loop {
        if check_fn().await? {
            return Ok(());
        }

        if start.elapsed() > timeout_duration {
            anyhow::bail!("wait_until timed out after {}ms", timeout_ms);
        }

        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

pub fn generate_bytes(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i % 256) as u8).collect()
}
