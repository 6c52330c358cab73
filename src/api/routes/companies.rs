//! Company Routes
//!
//! - GET /api/available-companies - Companies with stored report chunks

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::CompaniesResponse;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;

/// GET /api/available-companies
pub async fn available_companies(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<CompaniesResponse>> {
    let store = state.store().ok_or_else(ApiError::store_unavailable)?;

    let companies = store
        .companies()
        .await
        .map_err(|e| ApiError::Internal(format!("Could not fetch companies: {}", e)))?;

    tracing::debug!(count = companies.len(), "Listed available companies");

    Ok(Json(CompaniesResponse { companies }))
}
