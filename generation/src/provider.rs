//! Generation provider client.
//!
//! The provider returns raw model text; parsing and validation live in the
//! [`RecipeGenerator`](crate::generator::RecipeGenerator). A transient
//! failure the caller may retry is signalled with
//! [`GenerationError::Transient`]; every other error is terminal.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error};

use crate::error::{GenerationError, Result};

/// Sampling parameters for one model invocation.
///
/// The seed changes per attempt so identical inputs still land on
/// different recipes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingParams {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub seed: u64,
}

/// Trait for generation providers.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Get the name of this provider.
    fn name(&self) -> &str;

    /// One model invocation. Returns the raw generated text.
    async fn complete(&self, prompt: &str, sampling: &SamplingParams) -> Result<String>;

    /// Check if the provider is available (API key set, etc.).
    fn is_available(&self) -> bool;
}

/// Google Generative Language API provider.
pub struct GeminiProvider {
    /// API key.
    api_key: Option<String>,

    /// API base URL.
    base_url: String,

    /// HTTP client.
    client: reqwest::Client,

    /// Generation model.
    model: String,
}

impl GeminiProvider {
    /// Create a new Gemini provider.
    ///
    /// The API key is taken from `GEMINI_API_KEY` unless set explicitly.
    pub fn new() -> Self {
        Self {
            api_key: std::env::var("GEMINI_API_KEY").ok(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            client: reqwest::Client::new(),
            model: "models/gemini-flash-lite-latest".to_string(),
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

    /// Set the generation model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

impl Default for GeminiProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, prompt: &str, sampling: &SamplingParams) -> Result<String> {
        let api_key = self.api_key.as_ref().ok_or(GenerationError::NotConfigured)?;

        debug!("Generating with model: {}", self.model);

        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }],
            "generationConfig": {
                "temperature": sampling.temperature,
                "topP": sampling.top_p,
                "topK": sampling.top_k,
                "seed": sampling.seed,
            }
        });

        let response = self
            .client
            .post(format!(
                "{}/{}:generateContent?key={api_key}",
                self.base_url, self.model
            ))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            error!("Provider error ({status}): {raw}");

            if status == reqwest::StatusCode::SERVICE_UNAVAILABLE {
                return Err(GenerationError::Transient {
                    status: status.as_u16(),
                });
            }
            return Err(GenerationError::Api(format!("API error ({status}): {raw}")));
        }

        let result: GenerateContentResponse = response.json().await?;

        result
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .filter(|t| !t.is_empty())
            .ok_or(GenerationError::EmptyResponse)
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Generative Language API response format.
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: String,
}
