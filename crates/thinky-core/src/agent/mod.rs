//! The three wellbeing agents.
//!
//! Every agent operation has the same shape: shape the input, build a
//! prompt, hand it to the [`Generator`], and recover a JSON object from the
//! response with [`extract_json`].

pub mod mood;
pub mod nutritionist;
pub mod scheduler;

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::extract::{ExtractionError, extract_json};
use crate::generator::{GenerationError, Generator};
use crate::models::JsonObject;

pub use mood::MoodAnalyzer;
pub use nutritionist::Nutritionist;
pub use scheduler::LifeScheduler;

/// Errors from an agent operation.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The caller's input was rejected before any generation call.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No usable response text was obtained.
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// Response text was obtained but held no usable JSON object.
    #[error("could not recover JSON from generator response: {0}")]
    Extraction(#[from] ExtractionError),
}

// ---------------------------------------------------------------------------
// Shared pipeline
// ---------------------------------------------------------------------------

/// Send `prompt` to `generator` and recover the JSON object it answers with.
pub(crate) async fn run(
    generator: &dyn Generator,
    operation: &str,
    prompt: &str,
) -> Result<JsonObject, AgentError> {
    info!(
        operation,
        generator = generator.name(),
        prompt_len = prompt.len(),
        "sending prompt to generator"
    );

    let text = generator.generate(prompt).await?;
    debug!(operation, response_len = text.len(), "generator responded");

    let object = extract_json(&text)?;
    debug!(operation, keys = object.len(), "recovered JSON object");
    Ok(object)
}

// ---------------------------------------------------------------------------
// Agents
// ---------------------------------------------------------------------------

/// All three agents sharing one generator.
#[derive(Clone)]
pub struct Agents {
    pub mood: MoodAnalyzer,
    pub scheduler: LifeScheduler,
    pub nutritionist: Nutritionist,
}

impl Agents {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self {
            mood: MoodAnalyzer::new(Arc::clone(&generator)),
            scheduler: LifeScheduler::new(Arc::clone(&generator)),
            nutritionist: Nutritionist::new(generator),
        }
    }
}

impl std::fmt::Debug for Agents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agents")
            .field("generator", &self.mood.generator_name())
            .finish()
    }
}
