//! Context retrieval over a user's past recipes.
//!
//! Titles of highly similar past recipes become an auxiliary hint in the
//! generation prompt; they nudge the model toward variety without
//! hard-constraining the output.

use std::sync::Arc;

use tracing::{debug, warn};

use sous_embeddings::cosine_similarity;

use crate::error::Result;
use crate::store::RecipeStore;

/// Retrieves similar-recipe context for a generation request.
pub struct ContextRetriever {
    store: Arc<dyn RecipeStore>,
    threshold: f32,
}

impl ContextRetriever {
    /// Create a retriever over the given store.
    pub fn new(store: Arc<dyn RecipeStore>, threshold: f32) -> Self {
        Self { store, threshold }
    }

    /// Build the context hint for one request.
    ///
    /// Scans the user's stored recipes and keeps every title whose
    /// embedding scores strictly above the threshold against `current`,
    /// one title per line, in store iteration order. Returns an empty
    /// string when nothing qualifies.
    pub async fn retrieve(&self, user_id: &str, current: &[f32]) -> Result<String> {
        let past = self.store.embedded_recipes(user_id).await?;
        let mut context = String::new();

        for recipe in &past {
            let score = match cosine_similarity(current, &recipe.embedding) {
                Ok(score) => score,
                Err(err) => {
                    // Stored embeddings from an older model have a different
                    // dimension and can never qualify.
                    warn!("Skipping stored recipe {:?}: {err}", recipe.title);
                    continue;
                }
            };

            if score > self.threshold {
                context.push_str(&recipe.title);
                context.push('\n');
            }
        }

        debug!(
            "Context hint covers {} similar recipes",
            context.lines().count()
        );
        Ok(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryRecipeStore, StoredRecipe};
    use pretty_assertions::assert_eq;

    /// 2-d vector whose cosine similarity against `[1, 0]` is `score`.
    fn at_similarity(score: f32) -> Vec<f32> {
        vec![score, (1.0 - score * score).sqrt()]
    }

    async fn store_with(recipes: Vec<StoredRecipe>) -> Arc<MemoryRecipeStore> {
        let store = Arc::new(MemoryRecipeStore::new());
        for recipe in recipes {
            store.add("u1", recipe).await;
        }
        store
    }

    #[tokio::test]
    async fn test_retrieve_selects_above_threshold_in_store_order() {
        let store = store_with(vec![
            StoredRecipe::new("Butter Chicken", at_similarity(0.9)),
            StoredRecipe::new("Greek Salad", at_similarity(0.5)),
            StoredRecipe::new("Chicken Biryani", at_similarity(0.86)),
        ])
        .await;

        let retriever = ContextRetriever::new(store, 0.85);
        let context = retriever.retrieve("u1", &[1.0, 0.0]).await.unwrap();

        assert_eq!(context, "Butter Chicken\nChicken Biryani\n");
    }

    #[tokio::test]
    async fn test_retrieve_threshold_is_strict() {
        // [3, 4] against itself scores exactly 1.0 in f32.
        let store = store_with(vec![StoredRecipe::new("Exact", vec![3.0, 4.0])]).await;

        let retriever = ContextRetriever::new(store, 1.0);
        let context = retriever.retrieve("u1", &[3.0, 4.0]).await.unwrap();

        assert_eq!(context, "");
    }

    #[tokio::test]
    async fn test_retrieve_empty_without_recipes() {
        let store = Arc::new(MemoryRecipeStore::new());
        let retriever = ContextRetriever::new(store, 0.85);

        let context = retriever.retrieve("u1", &[1.0, 0.0]).await.unwrap();
        assert_eq!(context, "");
    }

    #[tokio::test]
    async fn test_retrieve_skips_mismatched_dimensions() {
        let store = store_with(vec![
            StoredRecipe::new("Stale", vec![1.0, 0.0, 0.0]),
            StoredRecipe::new("Fresh", at_similarity(0.95)),
        ])
        .await;

        let retriever = ContextRetriever::new(store, 0.85);
        let context = retriever.retrieve("u1", &[1.0, 0.0]).await.unwrap();

        assert_eq!(context, "Fresh\n");
    }
}
