//! PeerLens REST API
//!
//! HTTP API layer for PeerLens, built with Axum.
//!
//! # Endpoints
//!
//! ## Comparison
//! - `GET /api/available-companies` - Companies with stored report chunks
//! - `POST /api/compare` - Compare competitors against the base company
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! ## Dashboard
//! - Every other path is served from `static_dir`, falling back to
//!   `index.html`.
//!
//! # Example
//!
//! ```rust,ignore
//! use peerlens::api::{serve, ApiConfig, AppState};
//! use peerlens::comparison::{ComparisonEngine, ComparisonSettings};
//! use peerlens::provider::{GeminiClient, GeminiConfig};
//! use peerlens::store::{ChunkStore, StoreConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(ChunkStore::open_existing(&StoreConfig::default())?);
//!     let gemini = Arc::new(GeminiClient::new(GeminiConfig::default())?);
//!     let engine = ComparisonEngine::new(store, gemini.clone(), gemini, ComparisonSettings::default());
//!
//!     let config = ApiConfig::default();
//!     serve(AppState::new(Arc::new(engine), config.clone()), &config).await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::{ApiConfig, AppState};

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route(
            "/available-companies",
            get(routes::companies::available_companies),
        )
        .route("/compare", post(routes::compare::compare));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let static_dir = state.config.static_dir.clone();
    let dashboard =
        ServeDir::new(&static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    // Create shared state
    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api", api_routes)
        .nest("/health", health_routes)
        .fallback_service(dashboard)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(shared_state)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("PeerLens API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("PeerLens API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
