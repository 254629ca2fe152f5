//! Domain validation of the parsed AI payload.
//!
//! A recipe is rejected wholesale when any rule fails; offending
//! ingredients are never silently dropped.

use tracing::warn;

use crate::error::{GenerationError, Result};
use crate::prompt::HOME_PANTRY;
use crate::recipe::RawRecipe;

/// Minimum number of ingredients and steps.
const MIN_ENTRIES: usize = 4;

/// Validate a parsed recipe against the originally supplied ingredients.
///
/// Rules:
/// - the title is a non-empty string
/// - ingredients and steps each have at least [`MIN_ENTRIES`] entries
/// - every ingredient's textual form contains one of the supplied
///   ingredient names or one of the [`HOME_PANTRY`] terms
///   (case-insensitive substring match)
pub fn validate(recipe: &RawRecipe, input: &[String]) -> Result<()> {
    if recipe.title.trim().is_empty() {
        return Err(GenerationError::Validation("missing title".to_string()));
    }

    if recipe.ingredients.len() < MIN_ENTRIES {
        return Err(GenerationError::Validation(format!(
            "expected at least {MIN_ENTRIES} ingredients, got {}",
            recipe.ingredients.len()
        )));
    }

    if recipe.steps.len() < MIN_ENTRIES {
        return Err(GenerationError::Validation(format!(
            "expected at least {MIN_ENTRIES} steps, got {}",
            recipe.steps.len()
        )));
    }

    let allowed: Vec<String> = input.iter().map(|i| i.to_lowercase()).collect();

    for entry in &recipe.ingredients {
        let text = entry.to_text().to_lowercase();
        let permitted = allowed.iter().any(|a| text.contains(a.as_str()))
            || HOME_PANTRY.iter().any(|p| text.contains(p));

        if !permitted {
            warn!("Rejected ingredient outside allowlist: {text}");
            return Err(GenerationError::Validation(format!(
                "ingredient not derived from input or pantry: {}",
                entry.to_text()
            )));
        }
    }

    Ok(())
}
