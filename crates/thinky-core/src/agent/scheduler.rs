//! Schedule agent.
//!
//! All time-bearing inputs are normalized to `HH:MM` before they reach a
//! prompt; the caller's values are never modified.

use std::sync::Arc;

use tracing::debug;

use crate::generator::Generator;
use crate::models::JsonObject;
use crate::prompt::{build_adjust_prompt, build_custom_schedule_prompt, build_schedule_prompt};
use crate::time::{
    Event, Preferences, normalize_event_times, normalize_preferences, normalize_time_range,
};

use super::{AgentError, run};

/// Builds and adjusts daily schedules.
#[derive(Clone)]
pub struct LifeScheduler {
    generator: Arc<dyn Generator>,
}

impl LifeScheduler {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self { generator }
    }

    pub fn generator_name(&self) -> &str {
        self.generator.name()
    }

    /// Create a full-day schedule. Missing preferences fall back to the
    /// defaults.
    pub async fn create_schedule(
        &self,
        mood: &JsonObject,
        daily_goals: &[String],
        calendar_events: &[Event],
        preferences: Option<&Preferences>,
    ) -> Result<JsonObject, AgentError> {
        let events = normalize_event_times(calendar_events);
        let preferences = normalize_preferences(preferences);
        debug!(
            goals = daily_goals.len(),
            events = events.len(),
            "creating schedule"
        );

        let prompt = build_schedule_prompt(mood, daily_goals, &events, &preferences);
        run(self.generator.as_ref(), "create_schedule", &prompt).await
    }

    /// Adjust the remainder of `current_schedule` after a mood change.
    pub async fn adjust_schedule(
        &self,
        current_schedule: &JsonObject,
        new_mood: &JsonObject,
        completed_activities: &[String],
        new_events: &[Event],
    ) -> Result<JsonObject, AgentError> {
        let events = normalize_event_times(new_events);
        let prompt = build_adjust_prompt(current_schedule, new_mood, completed_activities, &events);
        run(self.generator.as_ref(), "adjust_schedule", &prompt).await
    }

    /// Schedule an explicit task list. An empty task list is rejected
    /// without calling the generator.
    pub async fn create_custom_schedule(
        &self,
        tasks: &[JsonObject],
        time_range: Option<&JsonObject>,
        fixed_events: &[Event],
        preferences: Option<&Preferences>,
        mood: Option<&JsonObject>,
    ) -> Result<JsonObject, AgentError> {
        if tasks.is_empty() {
            return Err(AgentError::InvalidInput("tasks must not be empty".to_string()));
        }

        let time_range = time_range.map(normalize_time_range);
        let events = normalize_event_times(fixed_events);
        let preferences = preferences.map(|p| normalize_preferences(Some(p)));
        debug!(tasks = tasks.len(), events = events.len(), "creating custom schedule");

        let prompt = build_custom_schedule_prompt(
            tasks,
            time_range.as_ref(),
            &events,
            preferences.as_ref(),
            mood,
        );
        run(self.generator.as_ref(), "create_custom_schedule", &prompt).await
    }
}
