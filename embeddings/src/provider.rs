//! Embedding provider client.
//!
//! The pipeline treats the embedding service as a black box: ingredient
//! phrase in, dense vector out. The concrete provider speaks the
//! OpenAI-compatible `/embeddings` wire format through OpenRouter.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::Embedding;
use crate::error::{EmbeddingError, Result};

/// Trait for embedding providers.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Get the name of this provider.
    fn name(&self) -> &str;

    /// Get the model used to generate embeddings.
    fn model(&self) -> &str;

    /// Generate an embedding for the given text.
    ///
    /// There is no retry at this layer; retries belong to the caller.
    async fn embed(&self, text: &str) -> Result<Embedding>;

    /// Check if the provider is available (API key set, etc.).
    fn is_available(&self) -> bool;
}

/// OpenRouter embedding provider (OpenAI-compatible wire format).
pub struct OpenRouterProvider {
    /// API key.
    api_key: Option<String>,

    /// API base URL.
    base_url: String,

    /// HTTP client.
    client: reqwest::Client,

    /// Embedding model.
    model: String,
}

impl OpenRouterProvider {
    /// Create a new OpenRouter provider.
    ///
    /// The API key is taken from `OPENROUTER_API_KEY` unless set explicitly.
    pub fn new() -> Self {
        Self {
            api_key: std::env::var("OPENROUTER_API_KEY").ok(),
            base_url: "https://openrouter.ai/api/v1".to_string(),
            client: reqwest::Client::new(),
            model: "text-embedding-3-small".to_string(),
        }
    }

    /// Set the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the embedding model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

impl Default for OpenRouterProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingProvider for OpenRouterProvider {
    fn name(&self) -> &str {
        "openrouter"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn embed(&self, text: &str) -> Result<Embedding> {
        let api_key = self.api_key.as_ref().ok_or(EmbeddingError::NotConfigured)?;

        debug!("Generating embedding with model: {}", self.model);

        let body = json!({
            "model": self.model,
            "input": text,
        });

        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::ApiRequest(format!(
                "API error: {error_text}"
            )));
        }

        let result: EmbeddingsResponse = response.json().await?;

        let embedding = result
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| {
                EmbeddingError::InvalidResponse("no embedding in response".to_string())
            })?;

        if embedding.is_empty() {
            return Err(EmbeddingError::InvalidResponse(
                "empty embedding vector".to_string(),
            ));
        }

        info!("Generated embedding with {} dimensions", embedding.len());

        Ok(embedding)
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }
}

/// OpenAI-compatible `/embeddings` response format.
#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    #[serde(default)]
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> OpenRouterProvider {
        OpenRouterProvider::new()
            .with_api_key("test-key")
            .with_base_url(server.uri())
    }

    #[tokio::test]
    async fn test_embed_returns_vector() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .and(header("Authorization", "Bearer test-key"))
            .and(body_partial_json(json!({
                "model": "text-embedding-3-small",
                "input": "chicken, rice",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"embedding": [0.1, 0.2, 0.3]}]
            })))
            .mount(&server)
            .await;

        let embedding = provider_for(&server).embed("chicken, rice").await.unwrap();
        assert_eq!(embedding, vec![0.1, 0.2, 0.3]);
    }

    #[tokio::test]
    async fn test_embed_missing_vector_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .mount(&server)
            .await;

        let err = provider_for(&server).embed("chicken").await.unwrap_err();
        assert_matches!(err, EmbeddingError::InvalidResponse(_));
    }

    #[tokio::test]
    async fn test_embed_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .mount(&server)
            .await;

        let err = provider_for(&server).embed("chicken").await.unwrap_err();
        assert_matches!(err, EmbeddingError::ApiRequest(msg) if msg.contains("upstream exploded"));
    }

    #[tokio::test]
    async fn test_embed_without_api_key() {
        let provider = OpenRouterProvider {
            api_key: None,
            base_url: "http://unused.invalid".to_string(),
            client: reqwest::Client::new(),
            model: "text-embedding-3-small".to_string(),
        };
        assert!(!provider.is_available());
        let err = provider.embed("chicken").await.unwrap_err();
        assert_matches!(err, EmbeddingError::NotConfigured);
    }
}
