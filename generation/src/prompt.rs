//! Prompt construction for the generation provider.

use crate::tags::PromptTags;

/// Staples the model may use even when the user did not supply them.
///
/// Ingredient validation matches against these terms case-insensitively, so
/// they are kept lowercase.
pub const HOME_PANTRY: [&str; 21] = [
    "oil",
    "salt",
    "pepper",
    "water",
    "butter",
    "milk",
    "cream",
    "garlic",
    "ginger",
    "onion",
    "tomato",
    "green chili",
    "turmeric",
    "cumin",
    "coriander",
    "chili",
    "paprika",
    "garam masala",
    "soy",
    "vinegar",
    "sugar",
];

/// Output-format and ingredient rules prepended to every prompt.
const RULES: &str = r#"You are a professional cookbook author.

STRICT RULES:

Return ONLY JSON.
No markdown.
No commentary.
No explanations.

You MUST generate a DIFFERENT recipe each time.

You may ONLY use:
- Provided ingredients
- Basic home pantry items (oil, salt, onion, garlic, milk, common spices)

DO NOT invent exotic or restaurant ingredients.

Include:
- Real quantities (grams, cups, tsp, tbsp)
- Real timings
- Heat levels
- Clear cooking steps

JSON format ONLY:

{
  "title": "",
  "ingredients": [
    "ingredient with quantity"
  ],
  "steps": [
    "step with timing and heat"
  ]
}"#;

/// Build the full prompt for one generation attempt.
///
/// The context hint is auxiliary: it nudges the model away from recipes the
/// user recently cooked without hard-constraining the output.
pub fn build_prompt(ingredients: &[String], context_hint: &str, tags: &PromptTags) -> String {
    let mut prompt = format!(
        "{RULES}\n\nCuisine style: {}\nDish type: {}\nPrimary cooking technique: {}\n\nIngredients:\n{}\n",
        tags.style,
        tags.dish_type,
        tags.technique,
        ingredients.join(", "),
    );

    if !context_hint.is_empty() {
        prompt.push_str(&format!(
            "\nThe user recently cooked these similar recipes, make something different:\n{context_hint}"
        ));
    }

    prompt
}
