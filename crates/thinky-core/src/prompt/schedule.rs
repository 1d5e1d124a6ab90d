//! Schedule prompts: full-day schedule, adjustment, and custom task
//! scheduling.
//!
//! Callers pass inputs that have already been through
//! [`crate::time`] normalization.

use crate::models::JsonObject;
use crate::time::{Event, Preferences};

use super::{push_json_section, push_output_format};

/// Scheduling principles shared by all schedule prompts.
const SCHEDULING_GUIDELINES: &str = r#"## Scheduling Guidelines

1. **Balance work and breaks.** Typically 50-60 minutes of focused work followed by a 10-15 minute break.
2. **Regular meals and hydration.** Respect the user's preferred meal times.
3. **Move.** Include physical activity sized to the user's energy.
4. **Mental health.** Include mindfulness or relaxation, more of it when the mood is low or stressed.
5. **Match energy.** Put demanding work where energy is highest; lighter tasks when it dips.
6. **Buffer time.** Leave transition time between tasks to reduce stress.
7. **Fixed events are fixed.** Never move or shorten existing calendar events.
8. **All times are 24-hour `HH:MM`.**
"#;

const SCHEDULE_FORMAT: &str = r#"
{
  "schedule": [
    {
      "time": "HH:MM",
      "duration_minutes": 30,
      "activity": "Activity description",
      "activity_type": "work|break|meal|exercise|mindfulness|other",
      "notes": "Optional notes or recommendations"
    }
  ],
  "day_summary": "Overall assessment of the day structure",
  "mood_based_recommendations": {
    "energy_management": "...",
    "break_activities": ["..."],
    "recommended_meals": ["..."],
    "mindfulness_practices": ["..."]
  },
  "adaptability_notes": "Suggestions for adjusting if energy or mood changes"
}
"#;

const ADJUST_FORMAT: &str = r#"
{
  "schedule": [
    {
      "time": "HH:MM",
      "duration_minutes": 30,
      "activity": "Activity description",
      "activity_type": "work|break|meal|exercise|mindfulness|other",
      "notes": "Optional notes or recommendations"
    }
  ],
  "day_summary": "...",
  "mood_based_recommendations": {
    "energy_management": "...",
    "break_activities": ["..."],
    "recommended_meals": ["..."],
    "mindfulness_practices": ["..."]
  },
  "adaptability_notes": "...",
  "change_summary": "What was adjusted and why"
}
"#;

const CUSTOM_FORMAT: &str = r#"
{
  "schedule": [
    {
      "time": "HH:MM",
      "duration_minutes": 60,
      "activity": "Task or event name",
      "activity_type": "task|fixed_event|break|meal|other",
      "notes": "Optional notes"
    }
  ],
  "unscheduled_tasks": ["Tasks that did not fit, with the reason"],
  "day_summary": "..."
}
"#;

fn push_header(prompt: &mut String) {
    prompt.push_str("# Life Scheduler\n\n");
    prompt.push_str(
        "You are a Life Scheduler. You build realistic daily schedules that \
         balance productivity, mental wellbeing, and physical health, and you \
         adapt them to the user's mood and energy.\n\n",
    );
    prompt.push_str(SCHEDULING_GUIDELINES);
    prompt.push('\n');
}

/// Build the prompt for a personalized full-day schedule.
pub fn build_schedule_prompt(
    mood: &JsonObject,
    daily_goals: &[String],
    calendar_events: &[Event],
    preferences: &Preferences,
) -> String {
    let mut prompt = String::with_capacity(4096);
    push_header(&mut prompt);

    push_json_section(&mut prompt, "Mood Analysis", mood);
    push_json_section(&mut prompt, "Daily Goals", daily_goals);
    push_json_section(&mut prompt, "Existing Calendar Events", calendar_events);
    push_json_section(&mut prompt, "User Preferences", preferences);

    prompt.push_str(
        "Create a schedule for the FULL day, daytime and evening. Include \
         evening activities such as dinner, exercise, relaxation, and \
         personal time. Give specific meal, activity, and mindfulness \
         recommendations based on the mood above.\n\n",
    );

    push_output_format(&mut prompt, SCHEDULE_FORMAT);
    prompt
}

/// Build the prompt for adjusting an existing schedule.
pub fn build_adjust_prompt(
    current_schedule: &JsonObject,
    new_mood: &JsonObject,
    completed_activities: &[String],
    new_events: &[Event],
) -> String {
    let mut prompt = String::with_capacity(4096);
    push_header(&mut prompt);

    push_json_section(&mut prompt, "Current Schedule", current_schedule);
    push_json_section(&mut prompt, "Updated Mood Analysis", new_mood);
    push_json_section(&mut prompt, "Completed Activities", completed_activities);
    push_json_section(&mut prompt, "New Events To Incorporate", new_events);

    prompt.push_str(
        "Modify the REMAINING schedule for the user's changed mood and energy \
         and fit in the new events, while still covering their important \
         goals. Do not reschedule completed activities. Keep a good balance \
         between work and personal time, especially in the evening.\n\n",
    );

    push_output_format(&mut prompt, ADJUST_FORMAT);
    prompt
}

/// Build the prompt for scheduling an explicit task list.
///
/// `time_range`, `preferences` and `mood` are optional; absent sections
/// are stated as such so the model does not invent them.
pub fn build_custom_schedule_prompt(
    tasks: &[JsonObject],
    time_range: Option<&JsonObject>,
    fixed_events: &[Event],
    preferences: Option<&Preferences>,
    mood: Option<&JsonObject>,
) -> String {
    let mut prompt = String::with_capacity(4096);
    push_header(&mut prompt);

    push_json_section(&mut prompt, "Tasks To Schedule", tasks);

    match time_range {
        Some(range) => push_json_section(&mut prompt, "Time Range", range),
        None => prompt.push_str("## Time Range\n\nNot specified: use reasonable waking hours.\n\n"),
    }

    push_json_section(&mut prompt, "Fixed Events", fixed_events);

    match preferences {
        Some(preferences) => push_json_section(&mut prompt, "User Preferences", preferences),
        None => prompt.push_str("## User Preferences\n\nNone provided.\n\n"),
    }

    if let Some(mood) = mood {
        push_json_section(&mut prompt, "Mood Analysis", mood);
    }

    prompt.push_str(
        "Place every task inside the time range without overlapping the fixed \
         events. Respect each task's duration and schedule higher-priority \
         tasks first. Insert breaks between long tasks. List any task that \
         does not fit under `unscheduled_tasks`.\n\n",
    );

    push_output_format(&mut prompt, CUSTOM_FORMAT);
    prompt
}
