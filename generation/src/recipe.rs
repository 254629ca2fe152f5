//! Recipe shapes: the untrusted AI payload and the canonical flat form.

use serde::{Deserialize, Serialize};

/// One ingredient as returned by the model.
///
/// Models sometimes return plain strings and sometimes structured
/// quantity/item objects. Both shapes are accepted here and resolved once
/// during normalization rather than checked ad hoc by every consumer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IngredientEntry {
    /// Already a flat line, e.g. `"200g chicken, diced"`.
    Plain(String),

    /// Structured quantity/item pair with optional preparation.
    Measured {
        quantity: String,
        item: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        preparation: Option<String>,
    },
}

impl IngredientEntry {
    /// Flatten to the canonical textual form.
    pub fn to_text(&self) -> String {
        match self {
            Self::Plain(text) => text.clone(),
            Self::Measured {
                quantity,
                item,
                preparation,
            } => match preparation {
                Some(prep) => format!("{quantity} {item}, {prep}"),
                None => format!("{quantity} {item}"),
            },
        }
    }
}

/// One cooking step as returned by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StepEntry {
    /// Already a flat line.
    Plain(String),

    /// Structured step carrying its instruction.
    Detailed { instruction: String },

    /// Any other shape the model produced. Flattens to an empty string so a
    /// single malformed step does not fail the parse of the whole payload.
    Other(serde_json::Value),
}

impl StepEntry {
    /// Flatten to the canonical textual form.
    pub fn to_text(&self) -> String {
        match self {
            Self::Plain(text) => text.clone(),
            Self::Detailed { instruction } => instruction.clone(),
            Self::Other(_) => String::new(),
        }
    }
}

/// Untrusted recipe parsed from the model response.
///
/// Must pass [`validate`](crate::validate::validate) before anything
/// downstream consumes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRecipe {
    pub title: String,
    pub ingredients: Vec<IngredientEntry>,
    pub steps: Vec<StepEntry>,
}

impl RawRecipe {
    /// Flatten every entry into the canonical form.
    ///
    /// Element count and order are preserved.
    pub fn normalize(&self) -> Recipe {
        Recipe {
            title: self.title.clone(),
            ingredients: self
                .ingredients
                .iter()
                .map(IngredientEntry::to_text)
                .collect(),
            steps: self.steps.iter().map(StepEntry::to_text).collect(),
        }
    }
}

/// The canonical recipe: flat, human-readable strings only.
///
/// This is the only recipe form the rest of the system sees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub title: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
}

impl Recipe {
    /// Serialized structured content, persisted alongside a saved recipe.
    pub fn content_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Human-readable instructions block, the form users edit after saving.
    pub fn render_text(&self) -> String {
        let ingredients = self
            .ingredients
            .iter()
            .map(|i| format!("- {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let steps = self
            .steps
            .iter()
            .enumerate()
            .map(|(i, s)| format!("{}. {s}", i + 1))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "{}\n\nIngredients:\n{ingredients}\n\nSteps:\n{steps}",
            self.title
        )
    }
}
