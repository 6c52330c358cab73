//! Ingest error types

use std::path::PathBuf;
use thiserror::Error;

use crate::provider::ProviderError;
use crate::store::StoreError;

/// Errors that can occur while ingesting reports
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to extract text from {path:?}: {error}")]
    Extract { path: PathBuf, error: String },

    #[error("Embedding failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid ingest settings: {0}")]
    InvalidSettings(String),
}
