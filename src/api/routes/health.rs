//! Health Routes
//!
//! Health check endpoints for monitoring and Kubernetes probes.
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health/ready - Readiness probe (chunk store reachable)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;

/// GET /health/live
///
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// Returns 200 once the chunk store is loaded and answers queries.
pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    match state.store() {
        Some(store) if store.count().await.is_ok() => StatusCode::OK,
        _ => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// GET /health
///
/// Full health status with store details.
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let (store_status, chunks, companies) = match state.store() {
        None => ("not_loaded", None, None),
        Some(store) => match (store.count().await, store.company_count().await) {
            (Ok(chunks), Ok(companies)) => ("ok", Some(chunks), Some(companies)),
            (chunks, companies) => {
                if let Err(e) = chunks.as_ref() {
                    tracing::warn!(error = %e, "Store health check failed");
                }
                ("error", chunks.ok(), companies.ok())
            }
        },
    };

    let overall_status = if store_status == "ok" {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: overall_status.to_string(),
        store: store_status.to_string(),
        chunks,
        companies,
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_liveness() {
        let status = liveness().await;
        assert_eq!(status, StatusCode::OK);
    }
}
