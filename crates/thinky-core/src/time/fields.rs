//! Time-field shaping for calendar events, preferences, and time ranges.
//!
//! All functions here work on copies; the caller's mappings are never
//! touched. Only string values are normalized, anything else in a time
//! field is carried over as-is.

use serde_json::{Map, Value, json};

use super::normalize_time;

/// A calendar event: a JSON object with optional `start_time`/`end_time`.
pub type Event = Map<String, Value>;

/// Scheduling preferences: a JSON object with optional `work_start_time`,
/// `work_end_time`, and a nested `preferred_meal_times` object.
pub type Preferences = Map<String, Value>;

const EVENT_TIME_FIELDS: &[&str] = &["start_time", "end_time"];
const WORK_TIME_FIELDS: &[&str] = &["work_start_time", "work_end_time"];
const MEAL_TIMES_FIELD: &str = "preferred_meal_times";

/// Normalize `start_time` and `end_time` on a copy of every event.
///
/// Output length equals input length. Fields absent on an input event stay
/// absent on the corresponding output event.
pub fn normalize_event_times(events: &[Event]) -> Vec<Event> {
    events
        .iter()
        .map(|event| {
            let mut copy = event.clone();
            normalize_fields(&mut copy, EVENT_TIME_FIELDS);
            copy
        })
        .collect()
}

/// Normalize `start_time` and `end_time` on a copy of a time range.
pub fn normalize_time_range(range: &Map<String, Value>) -> Map<String, Value> {
    let mut copy = range.clone();
    normalize_fields(&mut copy, EVENT_TIME_FIELDS);
    copy
}

/// Resolve preferences for scheduling.
///
/// `None` yields [`default_preferences`]. Otherwise a copy is returned with
/// the work hours and every meal time normalized; other keys are untouched.
pub fn normalize_preferences(preferences: Option<&Preferences>) -> Preferences {
    let Some(preferences) = preferences else {
        return default_preferences();
    };

    let mut copy = preferences.clone();
    normalize_fields(&mut copy, WORK_TIME_FIELDS);
    if let Some(Value::Object(meals)) = copy.get_mut(MEAL_TIMES_FIELD) {
        for value in meals.values_mut() {
            normalize_value(value);
        }
    }
    copy
}

/// Preferences used when the caller supplies none.
pub fn default_preferences() -> Preferences {
    serde_json::from_value(json!({
        "work_start_time": "09:00",
        "work_end_time": "17:00",
        "preferred_break_duration": 15,
        "preferred_meal_times": {
            "breakfast": "08:00",
            "lunch": "12:30",
            "dinner": "18:30"
        },
        "exercise_duration": 30,
        "mindfulness_duration": 10
    }))
    .unwrap_or_default()
}

fn normalize_fields(map: &mut Map<String, Value>, keys: &[&str]) {
    for key in keys {
        if let Some(value) = map.get_mut(*key) {
            normalize_value(value);
        }
    }
}

fn normalize_value(value: &mut Value) {
    if let Value::String(s) = value {
        *s = normalize_time(s);
    }
}
