//! Prompt construction for the three agents.
//!
//! Pure string assembly, no I/O. Every prompt embeds its inputs as
//! pretty-printed JSON and ends with the JSON shape the answer must take,
//! which is what [`crate::extract::extract_json`] later recovers.

pub mod mood;
pub mod nutrition;
pub mod schedule;

use serde::Serialize;

pub use mood::{MOOD_CATEGORIES, build_mood_prompt};
pub use nutrition::build_nutrition_prompt;
pub use schedule::{build_adjust_prompt, build_custom_schedule_prompt, build_schedule_prompt};

/// Closing instruction shared by every prompt.
const JSON_ONLY: &str = "Respond with a single JSON object in exactly this format. \
                         Do not add any text before or after the JSON.\n";

/// Pretty-print a value for embedding in a prompt.
fn pretty<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string())
}

/// Append a `## TITLE` section with a JSON body.
fn push_json_section<T: Serialize + ?Sized>(prompt: &mut String, title: &str, value: &T) {
    prompt.push_str(&format!("## {title}\n\n```json\n{}\n```\n\n", pretty(value)));
}

/// Append the output contract.
fn push_output_format(prompt: &mut String, format: &str) {
    prompt.push_str("## Output Format\n\n");
    prompt.push_str(JSON_ONLY);
    prompt.push_str("\n```json\n");
    prompt.push_str(format.trim());
    prompt.push_str("\n```\n");
}
