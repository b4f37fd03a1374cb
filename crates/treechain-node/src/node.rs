//! CoreNode - the main application entry point.
//!
//! Architecture:
//! - Single daemon process with shared RocksDB storage
//! - HTTP API for clients (nodes, witnesses, glyphs, logs, engine ops)
//! - One independent broadcast task per dashboard WebSocket connection

use crate::api;
use crate::engine::Engine;
use crate::error::Result;
use crate::storage::Storage;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

/// Configuration for a CoreNode.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Data directory for storage
    pub data_dir: PathBuf,

    /// HTTP API listen address
    pub api_addr: SocketAddr,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl CoreConfig {
    /// Create config from environment variables with sensible defaults.
    pub fn from_env() -> Self {
        let data_dir = PathBuf::from(
            std::env::var("TREECHAIN_DATA_DIR").unwrap_or_else(|_| "./treechain-data".to_string()),
        );

        let api_addr = std::env::var("TREECHAIN_API_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .expect("Invalid TREECHAIN_API_ADDR");

        Self { data_dir, api_addr }
    }
}

/// Shared state for the daemon - single storage instance shared by the API
/// handlers and every broadcast task.
pub struct CoreState {
    pub storage: Arc<Storage>,
    pub engine: Engine,
    pub config: CoreConfig,
}

/// A CoreNode instance.
pub struct CoreNode {
    state: Arc<CoreState>,
    config: CoreConfig,
}

impl CoreNode {
    /// Create a new CoreNode.
    pub async fn new(config: CoreConfig) -> Result<Self> {
        // Ensure data directory exists
        std::fs::create_dir_all(&config.data_dir)?;

        // Open single shared storage instance
        let storage = Arc::new(Storage::open(&config.data_dir)?);
        let engine = Engine::new(Arc::clone(&storage));

        let state = Arc::new(CoreState {
            storage,
            engine,
            config: config.clone(),
        });

        Ok(Self { state, config })
    }

    /// Get the shared state (for API handlers).
    pub fn state(&self) -> Arc<CoreState> {
        Arc::clone(&self.state)
    }

    /// Run the daemon (starts the HTTP server and WebSocket endpoint).
    pub async fn run(self) -> Result<()> {
        tracing::info!("CoreNode starting");
        tracing::info!("  API: http://{}", self.config.api_addr);
        tracing::info!("  Data: {:?}", self.config.data_dir);

        let app = api::build_router(self.state.clone());

        let listener = tokio::net::TcpListener::bind(self.config.api_addr).await?;
        tracing::info!("HTTP server listening on {}", self.config.api_addr);

        axum::serve(listener, app).await?;

        Ok(())
    }
}
