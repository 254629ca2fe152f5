//! Error types for the recipe pipeline.

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors from the recipe store seam.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Store unreachable.
    #[error("recipe store unavailable: {0}")]
    Unavailable(String),

    /// Backend-specific failure.
    #[error("recipe store error: {0}")]
    Backend(String),
}

/// Errors that can occur in the recipe pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Malformed request input; the caller's fault, never retried.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Embedding provider failure.
    #[error("embedding error: {0}")]
    Embedding(#[from] sous_embeddings::EmbeddingError),

    /// Generation failure.
    #[error("generation error: {0}")]
    Generation(#[from] sous_generation::GenerationError),

    /// Recipe store failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
