//! HTTP API Client
//!
//! Functions for communicating with the PeerLens REST API.

use gloo_net::http::Request;
use serde_json::Value;

use crate::state::controller::{CompareRequest, COMPANY_LIST_ERROR, GENERIC_API_ERROR};

/// Local-storage key for a custom API origin
const API_BASE_KEY: &str = "peerlens_api_url";

/// Get the API origin from local storage; empty means same origin
pub fn get_api_base() -> String {
    let url = web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(API_BASE_KEY).ok().flatten())
        .unwrap_or_default();
    // Normalize: remove trailing slash
    url.trim_end_matches('/').to_string()
}

// ============ Response Types ============

#[derive(Debug, serde::Deserialize)]
pub struct CompaniesResponse {
    pub companies: Vec<String>,
}

#[derive(Debug, serde::Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub detail: Option<String>,
}

// ============ API Functions ============

/// Fetch the companies available for comparison
pub async fn fetch_companies() -> Result<Vec<String>, String> {
    let api_base = get_api_base();

    let response = Request::get(&format!("{}/api/available-companies", api_base))
        .send()
        .await
        .map_err(|e| e.to_string())?;

    let ok = response.ok();
    let body = response.text().await.unwrap_or_default();
    companies_outcome(ok, &body)
}

/// Run a comparison; returns the raw payload for the controller to validate
pub async fn compare(request: &CompareRequest) -> Result<Value, String> {
    let api_base = get_api_base();

    let response = Request::post(&format!("{}/api/compare", api_base))
        .json(request)
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if !response.ok() {
        let body = response.text().await.unwrap_or_default();
        return Err(error_detail(&body));
    }

    response.json().await.map_err(|e| e.to_string())
}

/// Company names from the response; any non-2xx status is a fixed message
pub fn companies_outcome(ok: bool, body: &str) -> Result<Vec<String>, String> {
    if !ok {
        return Err(COMPANY_LIST_ERROR.to_string());
    }
    serde_json::from_str::<CompaniesResponse>(body)
        .map(|r| r.companies)
        .map_err(|e| e.to_string())
}

/// The server's `detail` message from an error body, or a generic one
pub fn error_detail(body: &str) -> String {
    serde_json::from_str::<ApiError>(body)
        .ok()
        .and_then(|e| e.detail)
        .unwrap_or_else(|| GENERIC_API_ERROR.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_detail_from_body() {
        let body = r#"{"detail": "Could not fetch companies: disk I/O error", "code": "INTERNAL_ERROR"}"#;
        assert_eq!(error_detail(body), "Could not fetch companies: disk I/O error");
    }

    #[test]
    fn test_error_detail_falls_back() {
        assert_eq!(error_detail(r#"{"code": "INTERNAL_ERROR"}"#), "An API error occurred.");
        assert_eq!(error_detail(r#"{"detail": null}"#), "An API error occurred.");
        assert_eq!(error_detail("<html>Bad Gateway</html>"), "An API error occurred.");
        assert_eq!(error_detail(""), "An API error occurred.");
    }

    #[test]
    fn test_companies_outcome() {
        assert_eq!(
            companies_outcome(true, r#"{"companies": ["JSW Steel", "SAIL"]}"#),
            Ok(vec!["JSW Steel".to_string(), "SAIL".to_string()])
        );
        assert!(companies_outcome(true, r#"{"names": []}"#).is_err());
    }

    #[test]
    fn test_companies_failure_ignores_detail() {
        let body = r#"{"detail": "Database not initialized."}"#;
        assert_eq!(
            companies_outcome(false, body),
            Err("Failed to fetch company list".to_string())
        );
    }
}
