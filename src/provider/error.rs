//! Provider error types

use thiserror::Error;

/// Errors that can occur when talking to an embedding or generation provider
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider unavailable")]
    Unavailable,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Request timeout")]
    Timeout,

    #[error("Rate limited")]
    RateLimited,

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("GOOGLE_API_KEY is not set")]
    MissingApiKey,
}

impl ProviderError {
    /// Whether the request is worth retrying
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ProviderError::Unavailable | ProviderError::Timeout | ProviderError::RateLimited
        )
    }
}
