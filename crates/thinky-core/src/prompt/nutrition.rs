//! Meal-plan prompt.

use serde_json::Value;

use crate::models::{JsonObject, NutritionRequest};

use super::{pretty, push_output_format};

const MEAL_PLAN_FORMAT: &str = r#"
{
  "meal_plan": {
    "breakfast": {"recipe": "...", "purpose": "...", "prep_time": "..."},
    "lunch": {"recipe": "...", "purpose": "...", "prep_time": "..."},
    "dinner": {"recipe": "...", "purpose": "...", "prep_time": "..."},
    "snack": {"recipe": "...", "purpose": "...", "prep_time": "..."}
  },
  "grocery_list": ["item1", "item2"],
  "summary": "How this plan supports the user's health and mood"
}
"#;

/// Mood profile rows and the keys each is read from, first match wins.
///
/// The mood analyzer emits the long keys; older callers send the short ones.
const PROFILE_FIELDS: &[(&str, &[&str])] = &[
    ("Mood", &["Mood tags", "Mood"]),
    ("Energy", &["Energy"]),
    ("Cravings", &["Cravings"]),
    ("Confidence", &["confidence score", "Confidence"]),
    ("Notes", &["personalized tips", "Notes"]),
];

fn profile_value<'a>(mood: &'a JsonObject, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| mood.get(*key))
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => pretty(other),
    }
}

fn render_list(items: Option<&Vec<String>>) -> String {
    match items {
        Some(items) if !items.is_empty() => items.join(", "),
        _ => "none".to_string(),
    }
}

/// Build the prompt for a one-day, home-cooked meal plan.
pub fn build_nutrition_prompt(request: &NutritionRequest) -> String {
    let mut prompt = String::with_capacity(3072);

    prompt.push_str("# Nutritionist\n\n");
    prompt.push_str(
        "You are a compassionate nutritionist. Recommend a nutritious one-day \
         meal plan the user can prepare at home from accessible, healthy \
         ingredients. Never suggest restaurants or takeout. Map mood to food \
         (calming foods for stress, energizing meals for fatigue), honor \
         dietary restrictions, and keep every meal safe for the listed medical \
         conditions and allergies.\n\n",
    );

    prompt.push_str("## User Profile\n\n");
    for (label, keys) in PROFILE_FIELDS {
        let value = profile_value(&request.mood_data, keys)
            .map(render)
            .unwrap_or_else(|| "unknown".to_string());
        prompt.push_str(&format!("- **{label}:** {value}\n"));
    }
    prompt.push_str(&format!(
        "- **Medical Conditions:** {}\n",
        render_list(request.medical_conditions.as_ref())
    ));
    prompt.push_str(&format!(
        "- **Dietary Preferences:** {}\n",
        render_list(request.dietary_preferences.as_ref())
    ));
    prompt.push_str(&format!(
        "- **Allergies:** {}\n",
        render_list(request.allergies.as_ref())
    ));
    prompt.push_str(&format!(
        "- **Goals:** {}\n\n",
        request.goals.as_deref().map(str::trim).filter(|g| !g.is_empty()).unwrap_or("none")
    ));

    prompt.push_str(
        "Plan breakfast, lunch, dinner, and a snack. Give each meal a recipe \
         name, its purpose for this user, and a prep time. Add a short grocery \
         list and a summary.\n\n",
    );

    push_output_format(&mut prompt, MEAL_PLAN_FORMAT);
    prompt
}
