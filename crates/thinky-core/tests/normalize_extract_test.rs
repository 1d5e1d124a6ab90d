//! Integration tests for the two pure building blocks through the public
//! API: time normalization over whole payloads, and JSON recovery from
//! realistic generator transcripts.

use serde_json::{Value, json};

use thinky_core::extract::{ExtractionError, extract_json};
use thinky_core::models::{CustomScheduleRequest, ScheduleRequest};
use thinky_core::time::{
    normalize_event_times, normalize_preferences, normalize_time, normalize_time_range,
};

// ===========================================================================
// Time normalization
// ===========================================================================

#[test]
fn every_clock_reading_normalizes_in_both_spellings() {
    for hour in 1..=12u32 {
        for minute in [0u32, 5, 30, 59] {
            let expected_hour = match hour {
                12 => 0,
                h => h,
            };
            let am = format!("{expected_hour:02}:{minute:02}");
            let pm = format!("{:02}:{minute:02}", expected_hour + 12);

            assert_eq!(normalize_time(&format!("{hour}:{minute:02} AM")), am);
            assert_eq!(normalize_time(&format!("{hour}:{minute:02}am")), am);
            assert_eq!(normalize_time(&format!("{hour}:{minute:02} PM")), pm);
            assert_eq!(normalize_time(&format!("{hour}:{minute:02}pm")), pm);
        }
    }
}

#[test]
fn normalized_output_is_a_fixed_point() {
    for input in ["9am", "12 PM", "7:05 p.m.", "23:59", "00:00", "garbage", ""] {
        let once = normalize_time(input);
        assert_eq!(normalize_time(&once), once, "not idempotent for {input:?}");
    }
}

#[test]
fn schedule_request_payload_normalizes_end_to_end() {
    let request: ScheduleRequest = serde_json::from_value(json!({
        "daily_goals": ["Finish report"],
        "calendar_events": [
            {"title": "Standup", "start_time": "9:30 AM", "end_time": "9:45am"},
            {"title": "Lunch", "start_time": "12pm", "duration": 60},
            {"title": "Focus", "start_time": "14:00", "end_time": null}
        ],
        "preferences": {
            "work_start_time": "8:30 a.m.",
            "preferred_meal_times": {"dinner": "7 PM", "snack": 15}
        }
    }))
    .unwrap();

    let events = normalize_event_times(request.calendar_events.as_deref().unwrap_or_default());
    assert_eq!(events[0]["start_time"], "09:30");
    assert_eq!(events[0]["end_time"], "09:45");
    assert_eq!(events[1]["start_time"], "12:00");
    assert_eq!(events[1]["duration"], 60);
    assert_eq!(events[2]["start_time"], "14:00");
    assert_eq!(events[2]["end_time"], Value::Null);

    let preferences = normalize_preferences(request.preferences.as_ref());
    assert_eq!(preferences["work_start_time"], "08:30");
    assert_eq!(preferences["preferred_meal_times"]["dinner"], "19:00");
    assert_eq!(preferences["preferred_meal_times"]["snack"], 15);
    assert!(preferences.get("work_end_time").is_none());
}

#[test]
fn custom_request_time_range_normalizes() {
    let request: CustomScheduleRequest = serde_json::from_value(json!({
        "tasks": [{"name": "Study", "duration_minutes": 90}],
        "time_range": {"start_time": "1 PM", "end_time": "6:00pm", "label": "afternoon"}
    }))
    .unwrap();

    let range = normalize_time_range(request.time_range.as_ref().unwrap());
    assert_eq!(range["start_time"], "13:00");
    assert_eq!(range["end_time"], "18:00");
    assert_eq!(range["label"], "afternoon");
}

// ===========================================================================
// JSON extraction
// ===========================================================================

#[test]
fn recovers_from_chatty_transcript() {
    let transcript = "Thought: I now know the final answer.\n\
                      Final Answer: Based on the user's tired mood, here's the plan:\n\
                      ```json\n\
                      {\n  \"schedule\": [{\"time\": \"10:00\", \"activity\": \"Deep work {focus}\"}],\n  \
                      \"day_summary\": \"Ease in\"\n}\n\
                      ```\n\
                      Let me know if you'd like changes!";

    let object = extract_json(transcript).unwrap();
    assert_eq!(object["day_summary"], "Ease in");
    assert_eq!(object["schedule"][0]["activity"], "Deep work {focus}");
}

#[test]
fn recovers_first_valid_object_after_broken_one() {
    let text = r#"Draft: {"Energy": Low} Corrected: {"Energy": "Low"}"#;
    assert_eq!(extract_json(text).unwrap()["Energy"], "Low");
}

#[test]
fn reports_distinct_failures() {
    assert_eq!(extract_json("   "), Err(ExtractionError::Empty));
    assert_eq!(extract_json("No plan today."), Err(ExtractionError::NotFound));
    assert_eq!(
        extract_json("Here you go: {\"summary\": \"cut off"),
        Err(ExtractionError::Unterminated)
    );
    assert!(matches!(
        extract_json("{not: json}"),
        Err(ExtractionError::Malformed { .. })
    ));
}
