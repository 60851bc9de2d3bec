//! Test server lifecycle management
//!
//! Each test gets an isolated server with its own mirror database and,
//! optionally, a fake upstream media server.

use super::constants::*;
use super::fake_upstream::FakePlex;
use super::fixtures::create_test_mirror;
use plex_mirror::config::{AppConfig, CliConfig};
use plex_mirror::{make_app, RequestsLoggingLevel, Resolver, ServerConfig};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Where the server under test looks for live data.
pub enum Upstream<'a> {
    /// Live mode off
    Offline,
    /// Live mode on against the fake server
    Fake(&'a FakePlex),
    /// Live mode on against a port nothing listens on
    Unreachable,
}

/// Test server instance with an isolated mirror database
///
/// When dropped, the server gracefully shuts down and temp resources are cleaned up.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    // Private fields - keep resources alive until drop
    _temp_db_dir: TempDir,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a server backed by the fixture mirror.
    pub async fn spawn(upstream: Upstream<'_>) -> Self {
        let (temp_db_dir, db_path) = create_test_mirror().expect("Failed to create test mirror");
        Self::spawn_with_db(upstream, temp_db_dir, db_path).await
    }

    /// Spawns a server whose mirror database does not exist.
    pub async fn spawn_without_mirror(upstream: Upstream<'_>) -> Self {
        let temp_db_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_db_dir.path().join("missing.db");
        Self::spawn_with_db(upstream, temp_db_dir, db_path).await
    }

    async fn spawn_with_db(upstream: Upstream<'_>, temp_db_dir: TempDir, db_path: PathBuf) -> Self {
        let (plex_url, offline) = match upstream {
            Upstream::Offline => (None, true),
            Upstream::Fake(fake) => (Some(fake.base_url.clone()), false),
            Upstream::Unreachable => (Some(unused_local_url().await), false),
        };

        let cli = CliConfig {
            db_path: Some(db_path),
            port: 0,
            logging_level: RequestsLoggingLevel::None,
            plex_url,
            plex_token: Some(PLEX_TOKEN.to_string()),
            offline,
            timeout_ms: REMOTE_TIMEOUT_MS,
            ..Default::default()
        };
        let config = AppConfig::resolve(&cli, None).expect("Failed to resolve config");
        let resolver = Resolver::from_config(&config).expect("Failed to build resolver");

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");

        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let base_url = format!("http://127.0.0.1:{}", port);

        // Create shutdown channel
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let server_config = ServerConfig {
            port,
            requests_logging_level: RequestsLoggingLevel::None,
        };
        let app = make_app(server_config, Arc::new(resolver));

        // Spawn server in background task with graceful shutdown
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            port,
            _temp_db_dir: temp_db_dir,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Waits for the server to become ready by polling the home endpoint
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

/// A local URL whose port was just released, so connections are refused.
async fn unused_local_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let port = listener
        .local_addr()
        .expect("Failed to get local address")
        .port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

impl Drop for TestServer {
    fn drop(&mut self) {
        // Send shutdown signal
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
        // TempDir will be cleaned up automatically
    }
}
