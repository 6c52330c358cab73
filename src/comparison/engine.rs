//! Comparison Engine
//!
//! Answers a comparison request with retrieval-augmented generation:
//!
//! 1. Embed the query
//! 2. Pull the most relevant chunks for the base company and each competitor
//! 3. Ask the generation model for `table_data` + `graph_data`
//! 4. Validate the returned JSON

use regex::Regex;
use std::sync::{Arc, OnceLock};

use super::error::ComparisonError;
use super::prompt::build_prompt;
use super::types::{CompareRequest, ComparisonResult};
use crate::provider::{EmbeddingProvider, GenerationProvider, TaskType};
use crate::store::ChunkStore;

/// Tunables for the comparison engine
#[derive(Debug, Clone)]
pub struct ComparisonSettings {
    /// Chunks retrieved per company
    pub chunks_per_company: usize,
}

impl Default for ComparisonSettings {
    fn default() -> Self {
        Self {
            chunks_per_company: 5,
        }
    }
}

/// Retrieval-augmented comparison over the chunk store
pub struct ComparisonEngine {
    store: Arc<ChunkStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    generator: Arc<dyn GenerationProvider>,
    settings: ComparisonSettings,
}

impl ComparisonEngine {
    pub fn new(
        store: Arc<ChunkStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        generator: Arc<dyn GenerationProvider>,
        settings: ComparisonSettings,
    ) -> Self {
        Self {
            store,
            embedder,
            generator,
            settings,
        }
    }

    /// Chunk store backing this engine
    pub fn store(&self) -> &Arc<ChunkStore> {
        &self.store
    }

    /// Compare the request's competitors against its base company
    pub async fn compare(&self, request: &CompareRequest) -> Result<ComparisonResult, ComparisonError> {
        request.validate()?;

        let query_embedding = self
            .embedder
            .embed(&request.query, TaskType::RetrievalQuery)
            .await?;

        let mut documents = Vec::new();
        for company in request.companies() {
            let chunks = self
                .store
                .query(&query_embedding, &company, self.settings.chunks_per_company)
                .await?;

            if chunks.is_empty() {
                tracing::warn!(company = %company, "No stored chunks for company");
            }
            documents.extend(chunks.into_iter().map(|c| c.text));
        }

        tracing::debug!(
            query = %request.query,
            competitors = ?request.competitors,
            documents = documents.len(),
            "Retrieved comparison context"
        );

        let context = documents.join("\n\n");
        let prompt = build_prompt(
            &request.query,
            &request.base_company,
            &request.competitors,
            &context,
        );

        let raw = self.generator.generate_json(&prompt).await?;
        let result = parse_model_output(&raw)?;

        tracing::info!(
            rows = result.table_data.len(),
            competitors = request.competitors.len(),
            "Comparison generated"
        );

        Ok(result)
    }
}

fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?s)^\s*```[A-Za-z]*\s*(.*?)\s*```\s*$").expect("fence pattern is valid")
    })
}

/// Parse the model's answer into a `ComparisonResult`.
///
/// Accepts a bare JSON object or one wrapped in a Markdown code fence.
pub fn parse_model_output(raw: &str) -> Result<ComparisonResult, ComparisonError> {
    let body = fence_regex()
        .captures(raw)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or(raw)
        .trim();

    let result: ComparisonResult =
        serde_json::from_str(body).map_err(|e| ComparisonError::MalformedOutput(e.to_string()))?;

    if result.graph_data.is_null() {
        return Err(ComparisonError::MalformedOutput(
            "graph_data is null".to_string(),
        ));
    }

    Ok(result)
}
