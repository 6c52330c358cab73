//! Vector store error types

use thiserror::Error;

/// Errors that can occur in the chunk store
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite operation failed
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// I/O operation failed (creating the data directory)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored embedding blob is not a whole number of f32 values
    #[error("Corrupt embedding for chunk {0}")]
    CorruptEmbedding(String),

    /// A stored `ingested_at` is not RFC 3339
    #[error("Corrupt timestamp for chunk {id}: {value:?}")]
    CorruptTimestamp { id: String, value: String },

    /// Query embedding and stored embeddings disagree on dimension
    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::DimensionMismatch {
            expected: 768,
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            "Embedding dimension mismatch: expected 768, got 3"
        );
    }
}
