//! Model Providers
//!
//! Embedding and text-generation backends used by ingest and comparison.
//!
//! The comparison engine and the ingest pipeline only see the
//! [`EmbeddingProvider`] and [`GenerationProvider`] traits, so tests can
//! swap in deterministic fakes. [`GeminiClient`] implements both against
//! the Generative Language REST API.

mod error;
mod gemini;

pub use error::ProviderError;
pub use gemini::{GeminiClient, GeminiConfig, ModelInfo};

use async_trait::async_trait;
use serde::Serialize;

/// What an embedding will be used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskType {
    /// A search query compared against stored documents
    RetrievalQuery,
    /// A document stored for later retrieval
    RetrievalDocument,
}

/// Turns text into embedding vectors
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text
    async fn embed(&self, text: &str, task: TaskType) -> Result<Vec<f32>, ProviderError>;

    /// Embed many texts; output order matches input order
    async fn embed_batch(
        &self,
        texts: &[String],
        task: TaskType,
    ) -> Result<Vec<Vec<f32>>, ProviderError>;
}

/// Produces a JSON document from a prompt
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Generate a response constrained to `application/json`
    async fn generate_json(&self, prompt: &str) -> Result<String, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&TaskType::RetrievalQuery).unwrap(),
            "\"RETRIEVAL_QUERY\""
        );
        assert_eq!(
            serde_json::to_string(&TaskType::RetrievalDocument).unwrap(),
            "\"RETRIEVAL_DOCUMENT\""
        );
    }
}
