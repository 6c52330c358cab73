//! API Error Types
//!
//! Defines error types for the API layer and implements conversion
//! to HTTP responses with appropriate status codes.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::comparison::ComparisonError;

/// API error types
///
/// The display text of each variant is what the dashboard shows the user.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request validation failed
    #[error("{0}")]
    Validation(String),

    /// Request body could not be decoded
    #[error("{message}")]
    BadRequest { status: StatusCode, message: String },

    /// Internal server error
    #[error("{0}")]
    Internal(String),

    /// Service unavailable (store not loaded)
    #[error("{0}")]
    ServiceUnavailable(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// The chunk store could not be opened at startup
    pub fn store_unavailable() -> Self {
        ApiError::ServiceUnavailable("Database not initialized.".to_string())
    }

    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            ApiError::BadRequest { status, .. } => (*status, "INVALID_BODY"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::ServiceUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE")
            }
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        }
    }
}

impl From<ComparisonError> for ApiError {
    fn from(e: ComparisonError) -> Self {
        match e {
            ComparisonError::Validation(msg) => ApiError::Validation(msg),
            other => ApiError::Internal(format!(
                "An error occurred while processing your request: {}",
                other
            )),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    /// Human-readable message shown by the dashboard
    pub detail: String,
    pub code: String,
    pub request_id: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let request_id = uuid::Uuid::new_v4().to_string();

        // Log the error
        tracing::error!(
            request_id = %request_id,
            error_code = %code,
            error_message = %self,
            "API error occurred"
        );

        let body = ErrorResponse {
            detail: self.to_string(),
            code: code.to_string(),
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderError;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::Validation("x".into()).into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::store_unavailable().into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::Internal("x".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_comparison_error_mapping() {
        let err: ApiError = ComparisonError::Validation("need competitors".into()).into();
        assert!(matches!(err, ApiError::Validation(ref m) if m == "need competitors"));

        let err: ApiError = ComparisonError::Provider(ProviderError::Timeout).into();
        assert!(err
            .to_string()
            .starts_with("An error occurred while processing your request: "));
    }
}
