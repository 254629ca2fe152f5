//! # Recipe Pipeline
//!
//! This crate wires the sous components into one request-scoped operation:
//! embed the ingredient list, retrieve similar-recipe context, generate a
//! recipe under strict constraints, and normalize the output.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Recipe Pipeline                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │  ingredients ──► EmbeddingProvider ──► Embedding                │
//! │                                            │                    │
//! │                                            ▼                    │
//! │  RecipeStore ────────────────► ContextRetriever                 │
//! │                                            │                    │
//! │                                            ▼                    │
//! │                     RecipeGenerator ──► RawRecipe               │
//! │                                            │                    │
//! │                                            ▼                    │
//! │                                     GeneratedRecipe             │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each request is an independent unit of work; the steps run strictly in
//! sequence because each consumes the previous step's output. The returned
//! [`GeneratedRecipe`] carries the raw embedding so the external save
//! operation can persist it for future similarity lookups.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sous_pipeline::RecipePipeline;
//!
//! let pipeline = RecipePipeline::builder()
//!     .with_store(store)
//!     .build()?;
//!
//! let generated = pipeline
//!     .generate_for_user("user-1", &["chicken".into(), "rice".into()])
//!     .await?;
//! ```

pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod store;

pub use config::{ContextConfig, EmbeddingConfig, PipelineConfig};
pub use context::ContextRetriever;
pub use engine::{GeneratedRecipe, RecipePipeline, RecipePipelineBuilder};
pub use error::{PipelineError, Result, StoreError};
pub use store::{MemoryRecipeStore, RecipeStore, StoredRecipe};

// Re-export from dependencies for convenience
pub use sous_embeddings::{Embedding, EmbeddingProvider, cosine_similarity};
pub use sous_generation::{GeneratorConfig, GenerationProvider, Recipe, TagSource};
