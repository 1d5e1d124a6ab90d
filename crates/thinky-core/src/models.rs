//! Request payloads for the schedule and nutrition agents.
//!
//! Field names match the HTTP API. Optional lists accept both a missing key
//! and an explicit `null`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::time::{Event, Preferences};

/// A JSON object as returned by the generation collaborator.
pub type JsonObject = Map<String, Value>;

/// Inputs for a full-day schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    #[serde(default)]
    pub daily_goals: Option<Vec<String>>,
    #[serde(default)]
    pub calendar_events: Option<Vec<Event>>,
    #[serde(default)]
    pub preferences: Option<Preferences>,
}

/// Inputs for adjusting an existing schedule after a mood change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdjustRequest {
    pub current_schedule: JsonObject,
    #[serde(default)]
    pub completed_activities: Option<Vec<String>>,
    #[serde(default)]
    pub new_events: Option<Vec<Event>>,
}

/// Inputs for scheduling an explicit task list inside a time window.
///
/// Each task carries at least a name and a duration, e.g.
/// `{"name": "Study calculus", "duration_minutes": 60, "priority": "high"}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomScheduleRequest {
    pub tasks: Vec<JsonObject>,
    #[serde(default)]
    pub time_range: Option<JsonObject>,
    #[serde(default)]
    pub fixed_events: Option<Vec<Event>>,
    #[serde(default)]
    pub user_preferences: Option<Preferences>,
}

/// Inputs for a one-day meal plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionRequest {
    pub mood_data: JsonObject,
    #[serde(default)]
    pub medical_conditions: Option<Vec<String>>,
    #[serde(default)]
    pub dietary_preferences: Option<Vec<String>>,
    #[serde(default)]
    pub allergies: Option<Vec<String>>,
    #[serde(default)]
    pub goals: Option<String>,
}
