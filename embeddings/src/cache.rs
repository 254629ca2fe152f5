//! Embedding cache to avoid redundant API calls.
//!
//! Users frequently re-submit the same ingredient list; the embedding for an
//! identical phrase is identical, so one network round trip suffices.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::Embedding;

/// Cache entry for an embedding.
#[derive(Debug, Clone)]
struct CacheEntry {
    embedding: Embedding,
    inserted_at: u64,
}

/// Bounded in-memory cache keyed by (text, model).
///
/// At capacity the oldest entry is evicted.
pub struct EmbeddingCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    max_entries: usize,
    ticks: AtomicU64,
}

impl EmbeddingCache {
    /// Create a new cache.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            max_entries,
            ticks: AtomicU64::new(0),
        }
    }

    /// Compute a hash for cache lookup.
    fn hash_key(text: &str, model: &str) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        model.hash(&mut hasher);
        format!("{:x}", hasher.finish())
    }

    /// Get an embedding from the cache.
    pub async fn get(&self, text: &str, model: &str) -> Option<Embedding> {
        let key = Self::hash_key(text, model);
        let entries = self.entries.read().await;
        entries.get(&key).map(|e| e.embedding.clone())
    }

    /// Put an embedding in the cache, evicting the oldest entry at capacity.
    pub async fn put(&self, text: &str, model: &str, embedding: Embedding) {
        let key = Self::hash_key(text, model);
        let entry = CacheEntry {
            embedding,
            inserted_at: self.ticks.fetch_add(1, Ordering::Relaxed),
        };

        let mut entries = self.entries.write().await;

        if entries.len() >= self.max_entries && !entries.contains_key(&key) {
            if let Some(oldest_key) = entries
                .iter()
                .min_by_key(|(_, e)| e.inserted_at)
                .map(|(k, _)| k.clone())
            {
                entries.remove(&oldest_key);
            }
        }

        entries.insert(key, entry);
        debug!("Cached embedding (model: {model})");
    }

    /// Check if an embedding is cached.
    pub async fn contains(&self, text: &str, model: &str) -> bool {
        let key = Self::hash_key(text, model);
        self.entries.read().await.contains_key(&key)
    }

    /// Get the number of cached embeddings.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Check if the cache is empty.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Clear the entire cache.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
        info!("Cleared embedding cache");
    }
}
