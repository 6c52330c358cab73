//! Chunk types stored in and returned from the vector store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A window of report text with its embedding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Stable id: `{company}_{source}_{chunk_index}`
    pub id: String,
    /// Company the report belongs to
    pub company: String,
    /// Source file name (e.g. `annual-report-2024.pdf`)
    pub source: String,
    /// Position of this chunk within its source
    pub chunk_index: usize,
    /// Chunk text
    pub text: String,
    /// Document embedding
    #[serde(skip)]
    pub embedding: Vec<f32>,
    /// When the chunk was written
    pub ingested_at: DateTime<Utc>,
}

impl Chunk {
    /// Create a chunk, deriving its id from company, source and index
    pub fn new(
        company: impl Into<String>,
        source: impl Into<String>,
        chunk_index: usize,
        text: impl Into<String>,
        embedding: Vec<f32>,
    ) -> Self {
        let company = company.into();
        let source = source.into();
        Self {
            id: chunk_id(&company, &source, chunk_index),
            company,
            source,
            chunk_index,
            text: text.into(),
            embedding,
            ingested_at: Utc::now(),
        }
    }
}

/// Build the id of a chunk
pub fn chunk_id(company: &str, source: &str, chunk_index: usize) -> String {
    format!("{}_{}_{}", company, source, chunk_index)
}

/// A chunk returned from a similarity query
#[derive(Debug, Clone, Serialize)]
pub struct ScoredChunk {
    pub id: String,
    pub company: String,
    pub source: String,
    pub text: String,
    /// Cosine similarity to the query, in [-1, 1]
    pub score: f32,
}

/// Cosine similarity of two vectors; 0.0 when either is empty or zero
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut mag_a = 0.0f32;
    let mut mag_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        mag_a += x * x;
        mag_b += y * y;
    }

    let denom = mag_a.sqrt() * mag_b.sqrt();
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}

/// Serialize an embedding as little-endian f32 bytes
pub fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(embedding.len() * 4);
    for val in embedding {
        bytes.extend_from_slice(&val.to_le_bytes());
    }
    bytes
}

/// Deserialize little-endian f32 bytes; `None` if the length is not a multiple of 4
pub fn bytes_to_embedding(bytes: &[u8]) -> Option<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        return None;
    }
    Some(
        bytes
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_id_format() {
        let chunk = Chunk::new("JSW Steel", "ar-2024.pdf", 3, "text", vec![]);
        assert_eq!(chunk.id, "JSW Steel_ar-2024.pdf_3");
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn test_embedding_bytes() {
        let embedding = vec![0.5f32, -1.25, 3.0];
        let bytes = embedding_to_bytes(&embedding);
        assert_eq!(bytes.len(), 12);
        assert_eq!(bytes_to_embedding(&bytes), Some(embedding));
        assert_eq!(bytes_to_embedding(&bytes[..5]), None);
    }
}
