//! # Recipe Generation
//!
//! This crate implements constrained AI recipe generation for the sous
//! pipeline:
//!
//! - **Prompt Construction**: Strict output-format rules, a home-pantry
//!   allowlist, and randomized style/dish/technique tags for variety
//! - **Provider Call**: Bounded timeout, cancellation, and retry only on
//!   provider-signalled transient failures
//! - **Validation**: Domain rules applied to the untrusted model output
//! - **Normalization**: Heterogeneous output shapes flattened to the
//!   canonical recipe form
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Recipe Generation                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  TagSource ──► PromptTags ──► build_prompt                      │
//! │                                    │                            │
//! │                                    ▼                            │
//! │  GenerationProvider ──► RecipeGenerator ──► RawRecipe           │
//! │                              │                  │               │
//! │                           validate          normalize           │
//! │                                                 │               │
//! │                                                 ▼               │
//! │                                              Recipe             │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Repeated calls with identical input produce different recipes by design;
//! every attempt re-draws its tags and sampling seed.

pub mod error;
pub mod generator;
pub mod prompt;
pub mod provider;
pub mod recipe;
pub mod tags;
pub mod validate;

pub use error::{GenerationError, Result};
pub use generator::{GeneratorConfig, RecipeGenerator};
pub use prompt::{HOME_PANTRY, build_prompt};
pub use provider::{GeminiProvider, GenerationProvider, SamplingParams};
pub use recipe::{IngredientEntry, RawRecipe, Recipe, StepEntry};
pub use tags::{PromptTags, TagSource, ThreadRngTags};
pub use validate::validate;
