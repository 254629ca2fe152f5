//! Randomized prompt diversification.
//!
//! Every generation attempt draws a fresh cuisine style, dish type, and
//! cooking technique so that repeated requests with the same ingredients
//! land on different recipes. The randomness source is injectable so tests
//! can pin the selection.

use rand::Rng;

/// Cuisine styles the prompt can ask for.
pub const STYLES: [&str; 7] = [
    "Indian home style",
    "Italian rustic",
    "Asian stir fry",
    "Creamy comfort food",
    "Healthy light meal",
    "Street food inspired",
    "Restaurant style",
];

/// Dish types the prompt can ask for.
pub const DISH_TYPES: [&str; 6] = [
    "curry",
    "skillet meal",
    "sautéed main",
    "spiced gravy dish",
    "dry fry with sauce",
    "quick weekday dinner",
];

/// Primary cooking techniques the prompt can ask for.
pub const TECHNIQUES: [&str; 7] = [
    "pan fry",
    "slow simmer",
    "high heat stir fry",
    "shallow fry",
    "one-pot curry",
    "dry roast then sauce",
    "skillet cooking",
];

/// Source of randomness for tag selection and sampling seeds.
pub trait TagSource: Send + Sync {
    /// Pick an index in `0..len`.
    fn pick_index(&self, len: usize) -> usize;

    /// Fresh sampling seed for one generation attempt.
    fn next_seed(&self) -> u64;
}

/// Default source backed by the thread-local generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngTags;

impl TagSource for ThreadRngTags {
    fn pick_index(&self, len: usize) -> usize {
        rand::rng().random_range(0..len)
    }

    fn next_seed(&self) -> u64 {
        rand::rng().random_range(0..1_000_000)
    }
}

/// The three tags embedded into one generation prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTags {
    pub style: &'static str,
    pub dish_type: &'static str,
    pub technique: &'static str,
}

impl PromptTags {
    /// Draw a fresh tag triple, each drawn uniformly from its list.
    pub fn pick(source: &dyn TagSource) -> Self {
        Self {
            style: STYLES[source.pick_index(STYLES.len())],
            dish_type: DISH_TYPES[source.pick_index(DISH_TYPES.len())],
            technique: TECHNIQUES[source.pick_index(TECHNIQUES.len())],
        }
    }
}
