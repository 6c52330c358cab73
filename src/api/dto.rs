//! Data Transfer Objects
//!
//! Response types for the API endpoints. The compare endpoint reuses
//! `CompareRequest` and `ComparisonResult` from the comparison module.

use serde::{Deserialize, Serialize};

/// GET /api/available-companies response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompaniesResponse {
    /// Sorted, distinct company names with stored chunks
    pub companies: Vec<String>,
}

/// Full health status response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status: healthy, degraded
    pub status: String,
    /// Store status: ok, error, not_loaded
    pub store: String,
    /// Stored chunk count
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunks: Option<usize>,
    /// Distinct companies in the store
    #[serde(skip_serializing_if = "Option::is_none")]
    pub companies: Option<usize>,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}
