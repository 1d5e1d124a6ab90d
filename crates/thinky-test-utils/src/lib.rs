//! Shared test utilities for thinky integration tests.
//!
//! Provides in-process [`Generator`] fakes so agent and HTTP tests never
//! spawn a real model:
//! - [`ScriptedGenerator`] answers with canned responses, in order, and
//!   records every prompt it was given.
//! - [`FailingGenerator`] always fails with a [`GenerationError`].

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use thinky_core::generator::{GenerationError, Generator};

/// Generator that replays canned responses in order.
///
/// Once the script is exhausted every further call fails with
/// [`GenerationError::EmptyResponse`].
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    responses: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Every prompt received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompts lock poisoned").clone()
    }

    /// Number of `generate` calls so far.
    pub fn calls(&self) -> usize {
        self.prompts.lock().expect("prompts lock poisoned").len()
    }

    /// Canned responses not yet consumed.
    pub fn remaining(&self) -> usize {
        self.responses.lock().expect("responses lock poisoned").len()
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts
            .lock()
            .expect("prompts lock poisoned")
            .push(prompt.to_string());
        self.responses
            .lock()
            .expect("responses lock poisoned")
            .pop_front()
            .ok_or(GenerationError::EmptyResponse)
    }
}

/// Generator that is always unavailable.
#[derive(Debug, Default)]
pub struct FailingGenerator {
    calls: Mutex<usize>,
}

impl FailingGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().expect("calls lock poisoned")
    }
}

#[async_trait]
impl Generator for FailingGenerator {
    fn name(&self) -> &str {
        "failing"
    }

    async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        *self.calls.lock().expect("calls lock poisoned") += 1;
        Err(GenerationError::Upstream("generator unavailable".to_string()))
    }
}
