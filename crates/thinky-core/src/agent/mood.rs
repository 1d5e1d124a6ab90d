//! Mood analysis agent.

use std::sync::Arc;

use crate::generator::Generator;
use crate::models::JsonObject;
use crate::prompt::build_mood_prompt;

use super::{AgentError, run};

/// Turns a free-text mood description into mood tags, energy, and cravings.
#[derive(Clone)]
pub struct MoodAnalyzer {
    generator: Arc<dyn Generator>,
}

impl MoodAnalyzer {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self { generator }
    }

    pub fn generator_name(&self) -> &str {
        self.generator.name()
    }

    /// Analyze `mood_text`. Blank text is rejected without calling the
    /// generator.
    pub async fn analyze(&self, mood_text: &str) -> Result<JsonObject, AgentError> {
        if mood_text.trim().is_empty() {
            return Err(AgentError::InvalidInput("mood_text must not be empty".to_string()));
        }
        run(self.generator.as_ref(), "analyze_mood", &build_mood_prompt(mood_text)).await
    }
}
