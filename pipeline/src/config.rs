//! Configuration for the recipe pipeline.

use serde::{Deserialize, Serialize};

use sous_generation::GeneratorConfig;

/// Configuration for the recipe pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Embedding client configuration.
    pub embedding: EmbeddingConfig,

    /// Context retrieval configuration.
    pub context: ContextConfig,

    /// Generation client configuration.
    pub generation: GeneratorConfig,
}

/// Configuration for the embedding client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Whether to cache embeddings.
    pub cache_enabled: bool,

    /// Maximum cache size.
    pub cache_max_entries: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            cache_max_entries: 10_000,
        }
    }
}

/// Configuration for context retrieval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Minimum cosine similarity for a past recipe to enter the context
    /// hint (strictly greater-than).
    pub similarity_threshold: f32,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.85,
        }
    }
}
