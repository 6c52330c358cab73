//! Comparison error types

use thiserror::Error;

use crate::provider::ProviderError;
use crate::store::StoreError;

/// Errors raised while answering a comparison
#[derive(Error, Debug)]
pub enum ComparisonError {
    /// The request itself is invalid
    #[error("{0}")]
    Validation(String),

    /// Embedding or generation failed
    #[error("{0}")]
    Provider(#[from] ProviderError),

    /// Chunk retrieval failed
    #[error("{0}")]
    Store(#[from] StoreError),

    /// The model answered with something other than the expected JSON object
    #[error("Model returned malformed output: {0}")]
    MalformedOutput(String),
}
