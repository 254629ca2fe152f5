//! The request-scoped generation pipeline.

use std::sync::Arc;

use tracing::{debug, info};

use sous_embeddings::{Embedding, EmbeddingCache, EmbeddingProvider, OpenRouterProvider};
use sous_generation::{
    GeminiProvider, GenerationProvider, Recipe, RecipeGenerator, TagSource,
};

use crate::config::PipelineConfig;
use crate::context::ContextRetriever;
use crate::error::{PipelineError, Result};
use crate::store::RecipeStore;

/// The pipeline's output artifact.
///
/// Carries the canonical recipe, the serialized content, and the raw
/// embedding the save operation persists for future similarity lookups.
#[derive(Debug, Clone)]
pub struct GeneratedRecipe {
    /// The normalized recipe.
    pub recipe: Recipe,

    /// Embedding of the submitted ingredient phrase.
    pub embedding: Embedding,

    /// Serialized structured content.
    pub content: String,
}

/// Request-scoped recipe generation: embed, retrieve context, generate,
/// normalize.
pub struct RecipePipeline {
    embedder: Arc<dyn EmbeddingProvider>,
    retriever: ContextRetriever,
    generator: RecipeGenerator,
    cache: Option<EmbeddingCache>,
}

impl std::fmt::Debug for RecipePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecipePipeline")
            .field("cache", &self.cache.is_some())
            .finish_non_exhaustive()
    }
}

impl RecipePipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> RecipePipelineBuilder {
        RecipePipelineBuilder::new()
    }

    /// Run the full pipeline for one user request.
    pub async fn generate_for_user(
        &self,
        user_id: &str,
        ingredients: &[String],
    ) -> Result<GeneratedRecipe> {
        if ingredients.is_empty() {
            return Err(PipelineError::InvalidInput(
                "ingredients must be a non-empty list".to_string(),
            ));
        }
        if ingredients.iter().any(|i| i.trim().is_empty()) {
            return Err(PipelineError::InvalidInput(
                "ingredients must not contain blank entries".to_string(),
            ));
        }

        // The comma join is load-bearing: stored similarity scores were
        // computed against embeddings of this exact phrasing.
        let phrase = ingredients.join(", ");
        let embedding = self.embed(&phrase).await?;
        debug!(
            "Embedded {} ingredients for user {user_id}",
            ingredients.len()
        );

        let context = self.retriever.retrieve(user_id, &embedding).await?;

        let raw = self.generator.generate(ingredients, &context).await?;
        let recipe = raw.normalize();
        let content = recipe.content_json()?;

        info!("Generated \"{}\" for user {user_id}", recipe.title);

        Ok(GeneratedRecipe {
            recipe,
            embedding,
            content,
        })
    }

    async fn embed(&self, text: &str) -> Result<Embedding> {
        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(text, self.embedder.model()).await {
                debug!("Embedding cache hit");
                return Ok(hit);
            }
            let embedding = self.embedder.embed(text).await?;
            cache
                .put(text, self.embedder.model(), embedding.clone())
                .await;
            return Ok(embedding);
        }

        Ok(self.embedder.embed(text).await?)
    }
}

/// Builder for the recipe pipeline.
///
/// The recipe store has no sensible default and must be supplied; the two
/// providers default to the real OpenRouter and Gemini clients.
pub struct RecipePipelineBuilder {
    config: PipelineConfig,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    generation: Option<Arc<dyn GenerationProvider>>,
    store: Option<Arc<dyn RecipeStore>>,
    tags: Option<Arc<dyn TagSource>>,
}

impl RecipePipelineBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
            embedder: None,
            generation: None,
            store: None,
            tags: None,
        }
    }

    /// Set the pipeline configuration.
    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the embedding provider.
    pub fn with_embedder(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(provider);
        self
    }

    /// Set the generation provider.
    pub fn with_generation_provider(mut self, provider: Arc<dyn GenerationProvider>) -> Self {
        self.generation = Some(provider);
        self
    }

    /// Set the recipe store.
    pub fn with_store(mut self, store: Arc<dyn RecipeStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the randomness source for prompt diversification.
    pub fn with_tag_source(mut self, tags: Arc<dyn TagSource>) -> Self {
        self.tags = Some(tags);
        self
    }

    /// Build the pipeline.
    pub fn build(self) -> Result<RecipePipeline> {
        let store = self
            .store
            .ok_or_else(|| PipelineError::Config("recipe store is required".to_string()))?;

        let embedder = self
            .embedder
            .unwrap_or_else(|| Arc::new(OpenRouterProvider::new()));
        let generation = self
            .generation
            .unwrap_or_else(|| Arc::new(GeminiProvider::new()));

        let retriever = ContextRetriever::new(store, self.config.context.similarity_threshold);

        let mut generator = RecipeGenerator::new(generation, self.config.generation.clone());
        if let Some(tags) = self.tags {
            generator = generator.with_tag_source(tags);
        }

        let cache = self
            .config
            .embedding
            .cache_enabled
            .then(|| EmbeddingCache::new(self.config.embedding.cache_max_entries));

        Ok(RecipePipeline {
            embedder,
            retriever,
            generator,
            cache,
        })
    }
}

impl Default for RecipePipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryRecipeStore;
    use assert_matches::assert_matches;

    #[test]
    fn test_builder_requires_store() {
        let err = RecipePipeline::builder().build().unwrap_err();
        assert_matches!(err, PipelineError::Config(msg) if msg.contains("store"));
    }

    #[test]
    fn test_builder_with_store_builds() {
        let pipeline = RecipePipeline::builder()
            .with_store(Arc::new(MemoryRecipeStore::new()))
            .build()
            .unwrap();

        assert!(pipeline.cache.is_some());
    }

    #[test]
    fn test_builder_honors_cache_config() {
        let mut config = PipelineConfig::default();
        config.embedding.cache_enabled = false;

        let pipeline = RecipePipeline::builder()
            .with_store(Arc::new(MemoryRecipeStore::new()))
            .with_config(config)
            .build()
            .unwrap();

        assert!(pipeline.cache.is_none());
    }
}
