//! PeerLens API Server
//!
//! Run with: cargo run --bin peerlens
//!
//! # Configuration
//!
//! Read from `config.toml` (see `peerlens-cli config`) with `PEERLENS_*`
//! environment overrides. The Gemini API key comes from `GOOGLE_API_KEY`.
//! `RUST_LOG` overrides the configured log level.

use anyhow::Context;
use std::sync::Arc;

use peerlens::api::{serve, ApiConfig, AppState};
use peerlens::comparison::ComparisonEngine;
use peerlens::config::Config;
use peerlens::provider::GeminiClient;
use peerlens::store::ChunkStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let loaded = Config::load_default();
    loaded.config.logging.init();
    loaded.log();
    let config = loaded.config;

    tracing::info!("Starting PeerLens API server v{}", env!("CARGO_PKG_VERSION"));

    let gemini = Arc::new(
        GeminiClient::new(config.gemini_config()).context("Cannot create Gemini client")?,
    );
    tracing::info!(
        embedding = %config.gemini.embedding_model,
        generation = %config.gemini.generation_model,
        "Gemini client configured"
    );

    let api_config = ApiConfig::new(&config.server.host, config.server.port)
        .with_static_dir(&config.server.static_dir);

    // A missing store is not fatal: data endpoints answer 503 until it is built
    let store_config = config.store_config();
    tracing::info!("Chunk store: {:?}", store_config.db_path());

    let state = match ChunkStore::open_existing(&store_config) {
        Ok(store) => {
            let store = Arc::new(store);
            match (store.count().await, store.company_count().await) {
                (Ok(chunks), Ok(companies)) => {
                    tracing::info!(chunks, companies, "Chunk store loaded")
                }
                (Err(e), _) | (_, Err(e)) => tracing::warn!("Chunk store not readable: {}", e),
            }

            let engine = ComparisonEngine::new(
                store,
                gemini.clone(),
                gemini,
                config.comparison_settings(),
            );
            AppState::new(Arc::new(engine), api_config.clone())
        }
        Err(e) => {
            tracing::warn!(
                "Could not open chunk store ({}). Run `peerlens-cli ingest` first.",
                e
            );
            AppState::without_store(api_config.clone())
        }
    };

    serve(state, &api_config).await?;
    Ok(())
}
