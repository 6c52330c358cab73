//! # PeerLens
//!
//! Annual-report comparison service. Compares a base company against
//! selected competitors by retrieving the most relevant report passages
//! for each and asking a language model for a metric table and chart.
//!
//! ## Modules
//!
//! - [`store`]: SQLite store of embedded report chunks
//! - [`provider`]: Embedding and generation providers (Gemini)
//! - [`comparison`]: Retrieval-augmented comparison engine
//! - [`ingest`]: PDF → chunk → embedding pipeline
//! - [`api`]: REST API server with Axum
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use peerlens::comparison::{CompareRequest, ComparisonEngine, ComparisonSettings};
//! use peerlens::provider::{GeminiClient, GeminiConfig};
//! use peerlens::store::{ChunkStore, StoreConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(ChunkStore::open_existing(&StoreConfig::default())?);
//!     let gemini = Arc::new(GeminiClient::new(GeminiConfig {
//!         api_key: std::env::var("GOOGLE_API_KEY")?,
//!         ..Default::default()
//!     })?);
//!
//!     let engine = ComparisonEngine::new(store, gemini.clone(), gemini, ComparisonSettings::default());
//!     let request = CompareRequest::new("Revenue and EBITDA for FY24", vec!["JSW Steel".into()]);
//!
//!     let result = engine.compare(&request).await?;
//!     println!("{} metrics compared", result.table_data.len());
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod comparison;
pub mod config;
pub mod ingest;
pub mod provider;
pub mod store;

// Re-export top-level types for convenience
pub use store::{Chunk, ChunkStore, ScoredChunk, StoreConfig, StoreError, StoreResult};

pub use provider::{
    EmbeddingProvider, GeminiClient, GeminiConfig, GenerationProvider, ModelInfo, ProviderError,
    TaskType,
};

pub use comparison::{
    CompareRequest, ComparisonEngine, ComparisonError, ComparisonResult, ComparisonSettings,
    DEFAULT_BASE_COMPANY,
};

pub use ingest::{IngestError, IngestPipeline, IngestReport, IngestSettings, PdfReader};

pub use api::{build_router, serve, ApiConfig, ApiError, AppState};

pub use config::{Config, ConfigError, LoggingConfig};
