//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::comparison::ComparisonEngine;
use crate::store::ChunkStore;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Comparison engine; `None` when the chunk store could not be opened
    pub engine: Option<Arc<ComparisonEngine>>,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(engine: Arc<ComparisonEngine>, config: ApiConfig) -> Self {
        Self {
            engine: Some(engine),
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// State for a server whose store failed to load. Data endpoints answer 503.
    pub fn without_store(config: ApiConfig) -> Self {
        Self {
            engine: None,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Chunk store, if loaded
    pub fn store(&self) -> Option<&Arc<ChunkStore>> {
        self.engine.as_ref().map(|e| e.store())
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Directory with the built dashboard
    pub static_dir: PathBuf,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            static_dir: PathBuf::from("static"),
        }
    }
}

impl ApiConfig {
    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = dir.into();
        self
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
