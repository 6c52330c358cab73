//! Comparison Routes
//!
//! - POST /api/compare - Compare competitors against the base company

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::comparison::{CompareRequest, ComparisonResult};

/// POST /api/compare
///
/// Runs retrieval and generation for the request and returns the
/// model's `table_data` and `graph_data`.
pub async fn compare(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CompareRequest>, JsonRejection>,
) -> ApiResult<Json<ComparisonResult>> {
    let Json(req) = payload?;

    // Body validation runs ahead of the store check
    req.validate()?;

    let engine = state.engine.as_ref().ok_or_else(ApiError::store_unavailable)?;

    tracing::info!(
        query = %req.query,
        base = %req.base_company,
        competitors = ?req.competitors,
        "Comparison requested"
    );

    let result = engine.compare(&req).await?;
    Ok(Json(result))
}
