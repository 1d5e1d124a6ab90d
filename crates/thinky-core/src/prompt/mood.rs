//! Mood analysis prompt.

use super::push_output_format;

/// Mood categories the analyzer may assign.
pub const MOOD_CATEGORIES: &[&str] = &[
    "happy",
    "sad",
    "excited",
    "tired",
    "anxious",
    "angry",
    "calm",
    "bored",
    "stressed",
    "nostalgic",
    "romantic",
    "celebratory",
    "craving_sweets",
    "craving_spicy",
    "craving_comfort_food",
];

const MOOD_FORMAT: &str = r#"
{
  "Mood tags": ["<mood1>", "<mood2>"],
  "Energy": "<Low|Medium|High>",
  "Cravings": ["spicy food"],
  "confidence score": "<Low|Medium|High>",
  "personalized tips": "..."
}
"#;

/// Build the prompt that turns a free-text mood description into mood
/// tags, energy, and cravings.
pub fn build_mood_prompt(mood_text: &str) -> String {
    let mut prompt = String::with_capacity(2048);

    prompt.push_str("# Mood Analyzer\n\n");
    prompt.push_str(
        "You are a Mood Analyzer. Read the user's own description of how they \
         feel and identify their current emotional and mental state, their \
         energy level, and any food cravings.\n\n",
    );

    prompt.push_str("## Mood Categories\n\n");
    prompt.push_str("Use one or more of these tags, and only these:\n\n");
    for category in MOOD_CATEGORIES {
        prompt.push_str(&format!("- `{category}`\n"));
    }
    prompt.push('\n');

    prompt.push_str("## User Input\n\n");
    prompt.push_str(mood_text.trim());
    prompt.push_str("\n\n");

    push_output_format(&mut prompt, MOOD_FORMAT);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_lists_every_category() {
        let prompt = build_mood_prompt("I feel great");
        for category in MOOD_CATEGORIES {
            assert!(prompt.contains(category), "missing category {category}");
        }
    }

    #[test]
    fn prompt_includes_trimmed_user_text() {
        let prompt = build_mood_prompt("  I got a new laptop and want luxurious food \n");
        assert!(prompt.contains("## User Input\n\nI got a new laptop and want luxurious food\n"));
    }

    #[test]
    fn prompt_contains_output_contract() {
        let prompt = build_mood_prompt("meh");
        assert!(prompt.contains("\"Mood tags\""));
        assert!(prompt.contains("\"Energy\""));
        assert!(prompt.contains("\"Cravings\""));
        assert!(prompt.contains("\"confidence score\""));
        assert!(prompt.contains("\"personalized tips\""));
        assert!(prompt.contains("single JSON object"));
    }
}
