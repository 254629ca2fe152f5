//! The generation client: prompt assembly, bounded retry, parsing and
//! validation of the model output.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{GenerationError, Result};
use crate::prompt::build_prompt;
use crate::provider::{GenerationProvider, SamplingParams};
use crate::recipe::RawRecipe;
use crate::tags::{PromptTags, TagSource, ThreadRngTags};
use crate::validate::validate;

/// Configuration for the recipe generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Deadline for one provider call. Elapsing it is terminal.
    pub timeout: Duration,

    /// Retries after a provider-signalled transient failure. Timeouts are
    /// never retried.
    pub max_retries: u32,

    /// Sampling temperature.
    pub temperature: f32,

    /// Nucleus sampling cutoff.
    pub top_p: f32,

    /// Top-k sampling cutoff.
    pub top_k: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(12),
            max_retries: 2,
            temperature: 1.1,
            top_p: 0.95,
            top_k: 64,
        }
    }
}

/// Client for constrained recipe generation.
///
/// Each attempt re-draws the tag triple and sampling seed, so retries ask
/// for a genuinely different recipe rather than replaying the failed
/// prompt.
pub struct RecipeGenerator {
    provider: Arc<dyn GenerationProvider>,
    tags: Arc<dyn TagSource>,
    config: GeneratorConfig,
}

impl RecipeGenerator {
    /// Create a generator with the default randomness source.
    pub fn new(provider: Arc<dyn GenerationProvider>, config: GeneratorConfig) -> Self {
        Self {
            provider,
            tags: Arc::new(ThreadRngTags),
            config,
        }
    }

    /// Replace the randomness source. Tests pin tag selection through this.
    pub fn with_tag_source(mut self, tags: Arc<dyn TagSource>) -> Self {
        self.tags = tags;
        self
    }

    /// Generate a recipe from the given ingredients and optional context
    /// hint.
    ///
    /// Transient provider failures are retried up to
    /// [`GeneratorConfig::max_retries`] times. Timeouts, parse failures and
    /// validation failures are terminal.
    pub async fn generate(&self, ingredients: &[String], context_hint: &str) -> Result<RawRecipe> {
        let mut attempt = 0u32;

        loop {
            let tags = PromptTags::pick(self.tags.as_ref());
            let prompt = build_prompt(ingredients, context_hint, &tags);
            let sampling = SamplingParams {
                temperature: self.config.temperature,
                top_p: self.config.top_p,
                top_k: self.config.top_k,
                seed: self.tags.next_seed(),
            };

            debug!(
                "Generation attempt {attempt}: style={}, dish={}, technique={}",
                tags.style, tags.dish_type, tags.technique
            );

            let call = self.provider.complete(&prompt, &sampling);
            match tokio::time::timeout(self.config.timeout, call).await {
                Err(_) => {
                    return Err(GenerationError::Timeout {
                        secs: self.config.timeout.as_secs(),
                    });
                }
                Ok(Err(GenerationError::Transient { status }))
                    if attempt < self.config.max_retries =>
                {
                    warn!("Transient provider failure (status {status}), retrying");
                    attempt += 1;
                }
                Ok(Err(err)) => return Err(err),
                Ok(Ok(text)) => {
                    let recipe = parse_recipe(&text)?;
                    validate(&recipe, ingredients)?;
                    info!("Generated recipe: {}", recipe.title);
                    return Ok(recipe);
                }
            }
        }
    }
}

/// Strip surrounding code-fence markup and parse the model text.
fn parse_recipe(text: &str) -> Result<RawRecipe> {
    let cleaned = strip_fences(text);
    if cleaned.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    Ok(serde_json::from_str(cleaned)?)
}

/// Remove ```json / ``` fences around the payload.
fn strip_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let trimmed = trimmed.strip_prefix("```json").unwrap_or(trimmed);
    let trimmed = trimmed.strip_prefix("```").unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix("```").unwrap_or(trimmed);
    trimmed.trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Provider that replays a scripted sequence of responses and records
    /// what it was asked.
    struct ScriptedProvider {
        responses: Mutex<VecDeque<Result<String>>>,
        seen: Mutex<Vec<(String, u64)>>,
    }

    impl ScriptedProvider {
        fn new(responses: Vec<Result<String>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.seen.lock().unwrap().len()
        }

        fn seeds(&self) -> Vec<u64> {
            self.seen.lock().unwrap().iter().map(|(_, s)| *s).collect()
        }
    }

    #[async_trait]
    impl GenerationProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(&self, prompt: &str, sampling: &SamplingParams) -> Result<String> {
            self.seen
                .lock()
                .unwrap()
                .push((prompt.to_string(), sampling.seed));
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("no scripted response left")
        }

        fn is_available(&self) -> bool {
            true
        }
    }

    /// Provider that never responds within any test deadline.
    struct StalledProvider;

    #[async_trait]
    impl GenerationProvider for StalledProvider {
        fn name(&self) -> &str {
            "stalled"
        }

        async fn complete(&self, _prompt: &str, _sampling: &SamplingParams) -> Result<String> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Err(GenerationError::EmptyResponse)
        }

        fn is_available(&self) -> bool {
            true
        }
    }

    /// Deterministic tag source with counting seeds.
    struct CountingTags {
        seeds: AtomicU64,
    }

    impl CountingTags {
        fn new() -> Self {
            Self {
                seeds: AtomicU64::new(0),
            }
        }
    }

    impl TagSource for CountingTags {
        fn pick_index(&self, _len: usize) -> usize {
            0
        }

        fn next_seed(&self) -> u64 {
            self.seeds.fetch_add(1, Ordering::Relaxed)
        }
    }

    fn input() -> Vec<String> {
        vec!["chicken".to_string(), "rice".to_string()]
    }

    fn valid_payload() -> String {
        serde_json::json!({
            "title": "Chicken Fried Rice",
            "ingredients": [
                "200g chicken, diced",
                "1 cup rice",
                "2 tbsp oil",
                "1 tsp salt",
                "1 onion, sliced"
            ],
            "steps": [
                "Heat oil on medium-high for 1 min",
                "Fry onion 3 min",
                "Add chicken, cook 8 min",
                "Add rice, stir fry 4 min",
                "Season with salt and serve"
            ]
        })
        .to_string()
    }

    fn generator(provider: Arc<ScriptedProvider>) -> RecipeGenerator {
        RecipeGenerator::new(provider, GeneratorConfig::default())
            .with_tag_source(Arc::new(CountingTags::new()))
    }

    #[tokio::test]
    async fn test_generate_success() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(valid_payload())]));
        let recipe = generator(provider.clone())
            .generate(&input(), "")
            .await
            .unwrap();

        assert_eq!(recipe.title, "Chicken Fried Rice");
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_fenced_payload_accepted() {
        let fenced = format!("```json\n{}\n```", valid_payload());
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(fenced)]));
        let recipe = generator(provider).generate(&input(), "").await.unwrap();
        assert_eq!(recipe.ingredients.len(), 5);
    }

    #[tokio::test]
    async fn test_transient_failures_retried_within_bound() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Err(GenerationError::Transient { status: 503 }),
            Err(GenerationError::Transient { status: 503 }),
            Ok(valid_payload()),
        ]));

        let recipe = generator(provider.clone())
            .generate(&input(), "")
            .await
            .unwrap();

        assert_eq!(recipe.title, "Chicken Fried Rice");
        assert_eq!(provider.calls(), 3);
        // Every attempt drew a fresh seed.
        assert_eq!(provider.seeds(), vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_transient_failures_exhaust_retries() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Err(GenerationError::Transient { status: 503 }),
            Err(GenerationError::Transient { status: 503 }),
            Err(GenerationError::Transient { status: 503 }),
        ]));

        let err = generator(provider.clone())
            .generate(&input(), "")
            .await
            .unwrap_err();

        assert_matches!(err, GenerationError::Transient { status: 503 });
        assert_eq!(provider.calls(), 3);
    }

    #[tokio::test]
    async fn test_timeout_is_terminal() {
        let config = GeneratorConfig {
            timeout: Duration::from_millis(20),
            ..Default::default()
        };
        let generator = RecipeGenerator::new(Arc::new(StalledProvider), config);

        let err = generator.generate(&input(), "").await.unwrap_err();
        assert_matches!(err, GenerationError::Timeout { .. });
    }

    #[tokio::test]
    async fn test_parse_failure_is_terminal() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok("not json".to_string())]));
        let err = generator(provider.clone())
            .generate(&input(), "")
            .await
            .unwrap_err();

        assert_matches!(err, GenerationError::Parse(_));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_validation_failure_is_terminal() {
        let payload = serde_json::json!({
            "title": "Sparse",
            "ingredients": ["1 cup rice", "2 tbsp oil", "1 tsp salt", "1 onion"],
            "steps": ["one", "two", "three"]
        })
        .to_string();
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(payload)]));

        let err = generator(provider.clone())
            .generate(&input(), "")
            .await
            .unwrap_err();

        assert_matches!(err, GenerationError::Validation(_));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_context_hint_reaches_prompt() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(valid_payload())]));
        generator(provider.clone())
            .generate(&input(), "Butter Chicken\n")
            .await
            .unwrap();

        let seen = provider.seen.lock().unwrap();
        assert!(seen[0].0.contains("Butter Chicken"));
    }

    #[test]
    fn test_strip_fences() {
        assert_eq!(strip_fences("```json\n{}\n```"), "{}");
        assert_eq!(strip_fences("```\n{}\n```"), "{}");
        assert_eq!(strip_fences("{}"), "{}");
        assert_eq!(strip_fences("  {\"a\":1}  "), "{\"a\":1}");
    }

    #[test]
    fn test_parse_recipe_empty_text() {
        assert_matches!(parse_recipe("```json```"), Err(GenerationError::EmptyResponse));
    }
}
