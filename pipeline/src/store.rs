//! Read-only seam to the recipe store.
//!
//! The pipeline only ever reads a user's past recipes; writes belong to the
//! external save operation.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use sous_embeddings::Embedding;

use crate::error::StoreError;

/// A stored recipe as the pipeline sees it: title and embedding only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredRecipe {
    /// Recipe title, the text that enters the context hint.
    pub title: String,

    /// Embedding persisted when the recipe was saved.
    pub embedding: Embedding,
}

impl StoredRecipe {
    /// Create a new stored recipe view.
    pub fn new(title: impl Into<String>, embedding: Embedding) -> Self {
        Self {
            title: title.into(),
            embedding,
        }
    }
}

/// Read access to a user's stored recipes.
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// All recipes for the user that carry a non-empty embedding, in store
    /// order.
    async fn embedded_recipes(&self, user_id: &str)
    -> std::result::Result<Vec<StoredRecipe>, StoreError>;
}

/// In-memory recipe store, used in tests and small deployments.
#[derive(Default)]
pub struct MemoryRecipeStore {
    recipes: RwLock<HashMap<String, Vec<StoredRecipe>>>,
}

impl MemoryRecipeStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a recipe for a user. Insertion order is preserved.
    pub async fn add(&self, user_id: impl Into<String>, recipe: StoredRecipe) {
        self.recipes
            .write()
            .await
            .entry(user_id.into())
            .or_default()
            .push(recipe);
    }
}

#[async_trait]
impl RecipeStore for MemoryRecipeStore {
    async fn embedded_recipes(
        &self,
        user_id: &str,
    ) -> std::result::Result<Vec<StoredRecipe>, StoreError> {
        let recipes = self.recipes.read().await;
        Ok(recipes
            .get(user_id)
            .map(|list| {
                list.iter()
                    .filter(|r| !r.embedding.is_empty())
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}
