//! Generative Language API client
//!
//! HTTP client for Google's Generative Language REST API.
//!
//! - `POST /{version}/{model}:embedContent` - single embedding
//! - `POST /{version}/{model}:batchEmbedContents` - batched embeddings
//! - `POST /{version}/{model}:generateContent` - JSON-mode generation
//! - `GET /{version}/models` - model listing
//!
//! The key travels in the `x-goog-api-key` header.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{EmbeddingProvider, GenerationProvider, ProviderError, TaskType};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Configuration for the Generative Language client
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API root (e.g. "https://generativelanguage.googleapis.com")
    pub base_url: String,
    /// API version path segment
    pub api_version: String,
    /// API key
    pub api_key: String,
    /// Model used for embeddings
    pub embedding_model: String,
    /// Model used for JSON generation
    pub generation_model: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Retries after the first attempt for retryable failures
    pub max_retries: u32,
    /// Base backoff; attempt `n` waits `n² × retry_base_ms`
    pub retry_base_ms: u64,
    /// Maximum texts per batchEmbedContents call
    pub batch_size: usize,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            api_version: "v1beta".to_string(),
            api_key: String::new(),
            embedding_model: "models/text-embedding-004".to_string(),
            generation_model: "models/learnlm-2.0-flash-experimental".to_string(),
            request_timeout_ms: 120_000,
            max_retries: 2,
            retry_base_ms: 1000,
            batch_size: 100,
        }
    }
}

/// Generative Language REST API client
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Create a new client; fails when no API key is configured
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderError> {
        if config.api_key.trim().is_empty() {
            return Err(ProviderError::MissingApiKey);
        }

        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn model_url(&self, model: &str, method: &str) -> String {
        format!(
            "{}/{}/{}:{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.api_version,
            qualified_model(model),
            method
        )
    }

    /// List models that support `generateContent`
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>, ProviderError> {
        let url = format!(
            "{}/{}/models",
            self.config.base_url.trim_end_matches('/'),
            self.config.api_version
        );

        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(&url)
                .header(API_KEY_HEADER, &self.config.api_key)
                .query(&[("pageSize", "100")]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let response = request.send().await.map_err(classify)?;
            let page: ListModelsResponse = read_response(response).await?;

            models.extend(
                page.models
                    .into_iter()
                    .filter(|m| m.supported_generation_methods.iter().any(|g| g == "generateContent")),
            );

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(models)
    }

    /// POST a JSON body with retry on rate limits, timeouts and connect errors
    async fn post_json<B: Serialize, R: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<R, ProviderError> {
        let mut last_error = ProviderError::Unavailable;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let delay = self.config.retry_base_ms * (attempt as u64).pow(2);
                tracing::debug!(attempt, delay_ms = delay, "Retrying provider request");
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }

            let response = match self
                .client
                .post(url)
                .header(API_KEY_HEADER, &self.config.api_key)
                .json(body)
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    last_error = classify(e);
                    if last_error.is_retryable() {
                        continue;
                    }
                    return Err(last_error);
                }
            };

            if response.status().as_u16() == 429 {
                let wait = retry_after(
                    response.headers().get("Retry-After").and_then(|v| v.to_str().ok()),
                    Duration::from_millis(self.config.request_timeout_ms),
                );
                if let Some(wait) = wait.filter(|_| attempt < self.config.max_retries) {
                    tokio::time::sleep(wait).await;
                }
                last_error = ProviderError::RateLimited;
                continue;
            }

            return read_response(response).await;
        }

        Err(last_error)
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiClient {
    async fn embed(&self, text: &str, task: TaskType) -> Result<Vec<f32>, ProviderError> {
        let model = qualified_model(&self.config.embedding_model);
        let url = self.model_url(&model, "embedContent");

        let body = EmbedContentRequest {
            model: model.clone(),
            content: Content::user_text(text),
            task_type: task,
        };

        let response: EmbedContentResponse = self.post_json(&url, &body).await?;
        Ok(response.embedding.values)
    }

    async fn embed_batch(
        &self,
        texts: &[String],
        task: TaskType,
    ) -> Result<Vec<Vec<f32>>, ProviderError> {
        let model = qualified_model(&self.config.embedding_model);
        let url = self.model_url(&model, "batchEmbedContents");
        let batch_size = self.config.batch_size.max(1);

        let mut embeddings = Vec::with_capacity(texts.len());
        for batch in texts.chunks(batch_size) {
            let body = BatchEmbedRequest {
                requests: batch
                    .iter()
                    .map(|text| EmbedContentRequest {
                        model: model.clone(),
                        content: Content::user_text(text),
                        task_type: task,
                    })
                    .collect(),
            };

            let response: BatchEmbedResponse = self.post_json(&url, &body).await?;
            if response.embeddings.len() != batch.len() {
                return Err(ProviderError::MalformedResponse(format!(
                    "expected {} embeddings, got {}",
                    batch.len(),
                    response.embeddings.len()
                )));
            }
            embeddings.extend(response.embeddings.into_iter().map(|e| e.values));
        }

        Ok(embeddings)
    }
}

#[async_trait]
impl GenerationProvider for GeminiClient {
    async fn generate_json(&self, prompt: &str) -> Result<String, ProviderError> {
        let url = self.model_url(&self.config.generation_model, "generateContent");

        let body = GenerateContentRequest {
            contents: vec![Content::user_text(prompt)],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
            },
        };

        let response: GenerateContentResponse = self.post_json(&url, &body).await?;

        let Some(candidate) = response.candidates.into_iter().next() else {
            let reason = response
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "no candidates".to_string());
            return Err(ProviderError::MalformedResponse(format!(
                "model returned no answer ({})",
                reason
            )));
        };

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ProviderError::MalformedResponse(
                "model returned an empty answer".to_string(),
            ));
        }

        tracing::debug!(chars = text.len(), "Generated comparison JSON");
        Ok(text)
    }
}

/// `Retry-After` seconds, capped at `limit`
fn retry_after(header: Option<&str>, limit: Duration) -> Option<Duration> {
    let secs = header?.trim().parse::<u64>().ok()?;
    Some(Duration::from_secs(secs).min(limit))
}

/// Prefix bare model ids with `models/`
fn qualified_model(model: &str) -> String {
    if model.starts_with("models/") || model.starts_with("tunedModels/") {
        model.to_string()
    } else {
        format!("models/{}", model)
    }
}

fn classify(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout
    } else if e.is_connect() {
        ProviderError::Unavailable
    } else {
        ProviderError::Request(e)
    }
}

/// Decode a success body or turn an error body into `ApiError`
async fn read_response<R: DeserializeOwned>(response: reqwest::Response) -> Result<R, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return response
            .json::<R>()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()));
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorEnvelope>(&text)
        .map(|envelope| envelope.error.message)
        .unwrap_or(text);

    Err(ProviderError::ApiError {
        status: status.as_u16(),
        message,
    })
}

// ============================================
// Request/Response DTOs
// ============================================

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn user_text(text: &str) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: vec![Part {
                text: Some(text.to_string()),
            }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedContentRequest {
    model: String,
    content: Content,
    task_type: TaskType,
}

#[derive(Debug, Deserialize)]
struct EmbedContentResponse {
    embedding: EmbeddingValues,
}

#[derive(Debug, Serialize)]
struct BatchEmbedRequest {
    requests: Vec<EmbedContentRequest>,
}

#[derive(Debug, Deserialize)]
struct BatchEmbedResponse {
    #[serde(default)]
    embeddings: Vec<EmbeddingValues>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
    #[serde(default)]
    next_page_token: Option<String>,
}

/// A model advertised by the API
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    /// Resource name, e.g. "models/gemini-1.5-flash"
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn test_client(server: &MockServer) -> GeminiClient {
        GeminiClient::new(GeminiConfig {
            base_url: server.base_url(),
            api_key: "test-key".to_string(),
            max_retries: 1,
            retry_base_ms: 1,
            batch_size: 2,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_missing_api_key() {
        let result = GeminiClient::new(GeminiConfig::default());
        assert!(matches!(result, Err(ProviderError::MissingApiKey)));
    }

    #[test]
    fn test_qualified_model() {
        assert_eq!(qualified_model("text-embedding-004"), "models/text-embedding-004");
        assert_eq!(qualified_model("models/text-embedding-004"), "models/text-embedding-004");
    }

    #[tokio::test]
    async fn test_embed_query() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1beta/models/text-embedding-004:embedContent")
                    .header("x-goog-api-key", "test-key")
                    .json_body_partial(r#"{"taskType": "RETRIEVAL_QUERY"}"#);
                then.status(200)
                    .json_body(json!({ "embedding": { "values": [0.1, 0.2, 0.3] } }));
            })
            .await;

        let client = test_client(&server);
        let embedding = client.embed("revenue", TaskType::RetrievalQuery).await.unwrap();

        mock.assert_async().await;
        assert_eq!(embedding, vec![0.1, 0.2, 0.3]);
    }

    #[tokio::test]
    async fn test_embed_batch_splits_requests() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1beta/models/text-embedding-004:batchEmbedContents");
                then.status(200).json_body(json!({
                    "embeddings": [ { "values": [1.0] }, { "values": [2.0] } ]
                }));
            })
            .await;

        let client = test_client(&server);
        let texts: Vec<String> = (0..4).map(|i| format!("chunk {}", i)).collect();
        let embeddings = client
            .embed_batch(&texts, TaskType::RetrievalDocument)
            .await
            .unwrap();

        assert_eq!(mock.hits_async().await, 2);
        assert_eq!(embeddings, vec![vec![1.0], vec![2.0], vec![1.0], vec![2.0]]);
    }

    #[tokio::test]
    async fn test_embed_batch_count_mismatch() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1beta/models/text-embedding-004:batchEmbedContents");
                then.status(200)
                    .json_body(json!({ "embeddings": [ { "values": [1.0] } ] }));
            })
            .await;

        let client = test_client(&server);
        let texts = vec!["a".to_string(), "b".to_string()];
        let err = client
            .embed_batch(&texts, TaskType::RetrievalDocument)
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_generate_json() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1beta/models/learnlm-2.0-flash-experimental:generateContent")
                    .json_body_partial(
                        r#"{"generationConfig": {"responseMimeType": "application/json"}}"#,
                    );
                then.status(200).json_body(json!({
                    "candidates": [
                        { "content": { "role": "model", "parts": [ { "text": "{\"table_data\": []," }, { "text": " \"graph_data\": {}}" } ] } }
                    ]
                }));
            })
            .await;

        let client = test_client(&server);
        let text = client.generate_json("prompt").await.unwrap();

        mock.assert_async().await;
        assert_eq!(text, "{\"table_data\": [], \"graph_data\": {}}");
    }

    #[tokio::test]
    async fn test_generate_blocked_prompt() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(200).json_body(json!({
                    "promptFeedback": { "blockReason": "SAFETY" }
                }));
            })
            .await;

        let client = test_client(&server);
        let err = client.generate_json("prompt").await.unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[tokio::test]
    async fn test_api_error_message_extracted() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(400).json_body(json!({
                    "error": { "code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT" }
                }));
            })
            .await;

        let client = test_client(&server);
        let err = client.embed("q", TaskType::RetrievalQuery).await.unwrap_err();
        match err {
            ProviderError::ApiError { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "API key not valid.");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_rate_limit_exhausts_retries() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(429);
            })
            .await;

        let client = test_client(&server);
        let err = client.embed("q", TaskType::RetrievalQuery).await.unwrap_err();

        assert!(matches!(err, ProviderError::RateLimited));
        assert_eq!(mock.hits_async().await, 2);
    }

    #[test]
    fn test_retry_after_capped() {
        let limit = Duration::from_millis(500);
        assert_eq!(retry_after(Some("86400"), limit), Some(limit));
        assert_eq!(retry_after(Some(" 0 "), limit), Some(Duration::ZERO));
        assert_eq!(retry_after(Some("Wed, 21 Oct 2015 07:28:00 GMT"), limit), None);
        assert_eq!(retry_after(None, limit), None);
    }

    #[tokio::test]
    async fn test_long_retry_after_does_not_stall() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(429).header("Retry-After", "86400");
            })
            .await;

        let client = GeminiClient::new(GeminiConfig {
            base_url: server.base_url(),
            api_key: "test-key".to_string(),
            max_retries: 1,
            retry_base_ms: 1,
            request_timeout_ms: 50,
            ..Default::default()
        })
        .unwrap();

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            client.embed("q", TaskType::RetrievalQuery),
        )
        .await
        .expect("rate-limited request should give up promptly");

        assert!(matches!(result, Err(ProviderError::RateLimited)));
        assert_eq!(mock.hits_async().await, 2);
    }

    #[tokio::test]
    async fn test_list_models_filters_generate_content() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v1beta/models");
                then.status(200).json_body(json!({
                    "models": [
                        { "name": "models/text-embedding-004", "supportedGenerationMethods": ["embedContent"] },
                        { "name": "models/gemini-1.5-flash", "supportedGenerationMethods": ["generateContent", "countTokens"] }
                    ]
                }));
            })
            .await;

        let client = test_client(&server);
        let models = client.list_models().await.unwrap();
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].name, "models/gemini-1.5-flash");
    }
}
