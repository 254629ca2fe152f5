//! # Embeddings
//!
//! This crate provides ingredient embedding generation and similarity
//! scoring for the sous recipe pipeline.
//!
//! ## Features
//!
//! - **Embedding Generation**: Convert an ingredient phrase to a dense vector
//! - **Similarity Scoring**: Cosine similarity between embeddings
//! - **Caching**: Avoid re-embedding identical submissions
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Embeddings System                           │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  EmbeddingProvider ──► Embedding ──► cosine_similarity          │
//! │       │                    ▲                                    │
//! │       ▼                    │                                    │
//! │  OpenRouter          EmbeddingCache                             │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod cache;
pub mod error;
pub mod provider;
pub mod similarity;

pub use cache::EmbeddingCache;
pub use error::{EmbeddingError, Result};
pub use provider::{EmbeddingProvider, OpenRouterProvider};
pub use similarity::cosine_similarity;

/// A dense vector embedding.
pub type Embedding = Vec<f32>;
