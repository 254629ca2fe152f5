//! Error types for recipe generation.

use thiserror::Error;

/// Result type alias for generation operations.
pub type Result<T> = std::result::Result<T, GenerationError>;

/// Errors that can occur while generating a recipe.
#[derive(Error, Debug)]
pub enum GenerationError {
    /// Provider not configured.
    #[error("generation provider not configured")]
    NotConfigured,

    /// The provider exceeded the request deadline. Never retried.
    #[error("generation timed out after {secs}s")]
    Timeout { secs: u64 },

    /// Provider-signalled transient failure; eligible for retry.
    #[error("transient provider failure (status {status})")]
    Transient { status: u16 },

    /// API request failed.
    #[error("API request failed: {0}")]
    Api(String),

    /// The provider returned no usable text.
    #[error("empty AI response")]
    EmptyResponse,

    /// The response text was not parseable as a recipe.
    #[error("unparseable AI response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Parsed recipe violates domain rules.
    #[error("invalid recipe: {0}")]
    Validation(String),

    /// HTTP error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}
