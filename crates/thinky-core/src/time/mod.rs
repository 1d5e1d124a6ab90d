//! Time normalization: heterogeneous human time strings to canonical `HH:MM`.
//!
//! Parsing is an ordered list of strategies. Each strategy reports a
//! [`ParseAttempt`]; the first [`ParseAttempt::Parsed`] wins. If every
//! strategy rejects the input, [`normalize_time`] passes the trimmed input
//! through unchanged and emits a `warn!` diagnostic (degraded mode).

pub mod fields;

use chrono::NaiveTime;
use tracing::{trace, warn};

pub use fields::{
    Event, Preferences, default_preferences, normalize_event_times, normalize_preferences,
    normalize_time_range,
};

/// Output format for canonical times.
const CANONICAL_FORMAT: &str = "%H:%M";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// AM/PM marker detected in a time string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meridiem {
    Am,
    Pm,
}

impl Meridiem {
    /// Detect an AM/PM marker anywhere in `input`.
    ///
    /// Case-insensitive; `a.m.` / `p.m.` count as markers. AM is checked
    /// first.
    pub fn detect(input: &str) -> Option<Self> {
        let lowered = unify_markers(input);
        if lowered.contains("am") {
            Some(Self::Am)
        } else if lowered.contains("pm") {
            Some(Self::Pm)
        } else {
            None
        }
    }

    /// Shift a 12-hour clock hour into 24-hour form.
    ///
    /// 12 AM is midnight, 12 PM is noon, PM hours 1-11 gain 12. Hours that
    /// are already past 12 are left alone.
    pub fn to_24h(self, hour: u32) -> u32 {
        match self {
            Self::Am if hour == 12 => 0,
            Self::Am => hour,
            Self::Pm if hour < 12 => hour + 12,
            Self::Pm => hour,
        }
    }

    fn token(self) -> &'static str {
        match self {
            Self::Am => "am",
            Self::Pm => "pm",
        }
    }
}

/// Outcome of a single parse strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseAttempt {
    /// The strategy recognized the input as this time of day.
    Parsed(NaiveTime),
    /// The strategy does not apply to this input.
    Rejected,
}

impl ParseAttempt {
    fn from_option(time: Option<NaiveTime>) -> Self {
        time.map_or(Self::Rejected, Self::Parsed)
    }
}

/// A named parse strategy.
struct Strategy {
    name: &'static str,
    parse: fn(&str, Option<Meridiem>) -> ParseAttempt,
}

/// Strategies for input carrying an AM/PM marker, in order.
const MERIDIEM_STRATEGIES: &[Strategy] = &[
    Strategy {
        name: "hour_minute_spaced_meridiem",
        parse: hour_minute_spaced_meridiem,
    },
    Strategy {
        name: "hour_minute_meridiem",
        parse: hour_minute_meridiem,
    },
    Strategy {
        name: "hour_meridiem",
        parse: hour_only_meridiem,
    },
    Strategy {
        name: "packed_hour_minute_meridiem",
        parse: packed_hour_minute_meridiem,
    },
    Strategy {
        name: "manual_split",
        parse: manual_split,
    },
];

/// Strategies for input without a marker (already 24-hour), in order.
const TWENTY_FOUR_HOUR_STRATEGIES: &[Strategy] = &[
    Strategy {
        name: "twenty_four_hour",
        parse: twenty_four_hour,
    },
    Strategy {
        name: "manual_split",
        parse: manual_split,
    },
];

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Normalize a human time string to canonical `HH:MM` (24-hour, zero-padded).
///
/// Never fails. When the input cannot be interpreted, the trimmed input is
/// returned unchanged and a warning is logged.
///
/// ```
/// use thinky_core::time::normalize_time;
///
/// assert_eq!(normalize_time("12:00 am"), "00:00");
/// assert_eq!(normalize_time("9 am"), "09:00");
/// assert_eq!(normalize_time("6:00 PM"), "18:00");
/// assert_eq!(normalize_time("17:30"), "17:30");
/// ```
pub fn normalize_time(input: &str) -> String {
    let trimmed = input.trim();
    match parse_time(trimmed) {
        Some(time) => time.format(CANONICAL_FORMAT).to_string(),
        None => {
            warn!(input = trimmed, "could not normalize time, passing it through unchanged");
            trimmed.to_string()
        }
    }
}

/// Parse a time string into a [`NaiveTime`], or `None` if no strategy
/// recognizes it. Leading and trailing whitespace is ignored.
pub fn parse_time(input: &str) -> Option<NaiveTime> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let meridiem = Meridiem::detect(trimmed);
    let strategies = match meridiem {
        Some(_) => MERIDIEM_STRATEGIES,
        None => TWENTY_FOUR_HOUR_STRATEGIES,
    };

    strategies
        .iter()
        .find_map(|strategy| match (strategy.parse)(trimmed, meridiem) {
            ParseAttempt::Parsed(time) => {
                trace!(strategy = strategy.name, input = trimmed, "parsed time");
                Some(time)
            }
            ParseAttempt::Rejected => None,
        })
}

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn chrono_format(input: &str, format: &str) -> ParseAttempt {
    ParseAttempt::from_option(NaiveTime::parse_from_str(input, format).ok())
}

/// "9:00 AM"
fn hour_minute_spaced_meridiem(input: &str, _: Option<Meridiem>) -> ParseAttempt {
    chrono_format(input, "%I:%M %p")
}

/// "9:00AM"
fn hour_minute_meridiem(input: &str, _: Option<Meridiem>) -> ParseAttempt {
    chrono_format(input, "%I:%M%p")
}

/// "9:00", "21:00"
fn twenty_four_hour(input: &str, _: Option<Meridiem>) -> ParseAttempt {
    chrono_format(input, CANONICAL_FORMAT)
}

/// "9 am", "9AM", "11 p.m.": an hour and a marker, nothing else.
fn hour_only_meridiem(input: &str, meridiem: Option<Meridiem>) -> ParseAttempt {
    let Some(meridiem) = meridiem else {
        return ParseAttempt::Rejected;
    };
    let body = strip_marker(input, meridiem);
    if body.is_empty() || body.len() > 2 || !body.bytes().all(|b| b.is_ascii_digit()) {
        return ParseAttempt::Rejected;
    }
    match body.parse::<u32>() {
        Ok(hour @ 1..=12) => {
            ParseAttempt::from_option(NaiveTime::from_hms_opt(meridiem.to_24h(hour), 0, 0))
        }
        _ => ParseAttempt::Rejected,
    }
}

/// `930 pm`, `0930pm`, `1145 am`: three or four digits, hour then minute.
fn packed_hour_minute_meridiem(input: &str, meridiem: Option<Meridiem>) -> ParseAttempt {
    let Some(meridiem) = meridiem else {
        return ParseAttempt::Rejected;
    };
    let body = strip_marker(input, meridiem);
    if !(3..=4).contains(&body.len()) || !body.bytes().all(|b| b.is_ascii_digit()) {
        return ParseAttempt::Rejected;
    }
    let Ok(packed) = body.parse::<u32>() else {
        return ParseAttempt::Rejected;
    };
    let (hour, minute) = (packed / 100, packed % 100);
    if !(1..=12).contains(&hour) || minute > 59 {
        return ParseAttempt::Rejected;
    }
    ParseAttempt::from_option(NaiveTime::from_hms_opt(meridiem.to_24h(hour), minute, 0))
}

/// Strip the marker, split the remainder on `:` (or `.`), default the
/// minute to zero, and apply the AM/PM shift.
fn manual_split(input: &str, meridiem: Option<Meridiem>) -> ParseAttempt {
    let body = match meridiem {
        Some(m) => strip_marker(input, m),
        None => input.to_string(),
    };

    let mut parts = body.splitn(2, [':', '.']);
    let hour = parts.next().map(str::trim).and_then(|h| h.parse::<u32>().ok());
    let minute = match parts.next() {
        Some(m) => m.trim().parse::<u32>().ok(),
        // A bare number is only an hour when a marker says so.
        None if meridiem.is_some() => Some(0),
        None => None,
    };

    let (Some(hour), Some(minute)) = (hour, minute) else {
        return ParseAttempt::Rejected;
    };
    // There is no zero o'clock in the afternoon.
    if hour == 0 && meridiem == Some(Meridiem::Pm) {
        return ParseAttempt::Rejected;
    }
    let hour = match meridiem {
        Some(m) => m.to_24h(hour),
        None => hour,
    };
    ParseAttempt::from_option(NaiveTime::from_hms_opt(hour, minute, 0))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Lowercase and collapse `a.m.`/`p.m.` spellings into `am`/`pm`.
fn unify_markers(input: &str) -> String {
    input
        .to_ascii_lowercase()
        .replace("a.m.", "am")
        .replace("p.m.", "pm")
}

/// Everything before the first marker token, trimmed.
fn strip_marker(input: &str, meridiem: Meridiem) -> String {
    let unified = unify_markers(input);
    let before = unified
        .split(meridiem.token())
        .next()
        .unwrap_or_default();
    before.trim().to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midnight_and_noon() {
        assert_eq!(normalize_time("12:00 am"), "00:00");
        assert_eq!(normalize_time("12:00 pm"), "12:00");
        assert_eq!(normalize_time("12:30 AM"), "00:30");
        assert_eq!(normalize_time("12 pm"), "12:00");
    }

    #[test]
    fn hour_only_forms() {
        assert_eq!(normalize_time("9 am"), "09:00");
        assert_eq!(normalize_time("9am"), "09:00");
        assert_eq!(normalize_time("11 PM"), "23:00");
        assert_eq!(normalize_time("7 p.m."), "19:00");
    }

    #[test]
    fn twenty_four_hour_passthrough() {
        assert_eq!(normalize_time("9:00"), "09:00");
        assert_eq!(normalize_time("17:30"), "17:30");
        assert_eq!(normalize_time("00:05"), "00:05");
        assert_eq!(normalize_time("  21:00 "), "21:00");
    }

    #[test]
    fn compact_and_dotted_markers() {
        assert_eq!(normalize_time("9:00AM"), "09:00");
        assert_eq!(normalize_time("6:45pm"), "18:45");
        assert_eq!(normalize_time("8:15 a.m."), "08:15");
        assert_eq!(normalize_time("10:30 P.M."), "22:30");
        assert_eq!(normalize_time("930 pm"), "21:30");
        assert_eq!(normalize_time("0930pm"), "21:30");
        assert_eq!(normalize_time("1145 am"), "11:45");
        assert_eq!(normalize_time("1200am"), "00:00");
        assert_eq!(normalize_time("705 p.m."), "19:05");
    }

    #[test]
    fn packed_digits_out_of_range_pass_through() {
        assert_eq!(normalize_time("1360 pm"), "1360 pm");
        assert_eq!(normalize_time("0030 pm"), "0030 pm");
        assert_eq!(normalize_time("13:00"), "13:00");
        assert_eq!(normalize_time("12345 am"), "12345 am");
    }

    #[test]
    fn zero_hour_with_pm_marker_passes_through() {
        assert_eq!(normalize_time("00:00 pm"), "00:00 pm");
        assert_eq!(normalize_time("0:30pm"), "0:30pm");
    }

    #[test]
    fn irregular_spacing_falls_back_to_manual_split() {
        assert_eq!(normalize_time("9 : 30 pm"), "21:30");
        assert_eq!(normalize_time("7.30 pm"), "19:30");
        assert_eq!(normalize_time("14.15"), "14:15");
    }

    #[test]
    fn unparseable_input_passes_through_trimmed() {
        assert_eq!(normalize_time("  whenever  "), "whenever");
        assert_eq!(normalize_time(""), "");
        assert_eq!(normalize_time("25:00"), "25:00");
        assert_eq!(normalize_time("9:75 am"), "9:75 am");
        assert_eq!(normalize_time("9"), "9");
    }

    #[test]
    fn every_twelve_hour_time_maps_correctly() {
        for h in 1..=12u32 {
            for m in [0u32, 1, 15, 30, 59] {
                let am = normalize_time(&format!("{h}:{m:02} AM"));
                let pm = normalize_time(&format!("{h}:{m:02} PM"));
                assert_eq!(am, format!("{:02}:{m:02}", h % 12), "AM input {h}:{m:02}");
                assert_eq!(pm, format!("{:02}:{m:02}", h % 12 + 12), "PM input {h}:{m:02}");
            }
        }
    }

    #[test]
    fn normalization_is_idempotent() {
        for input in [
            "12:00 am", "9 am", "9:00", "17:30", "7.30 pm", "garbage", "", "13:00 pm",
        ] {
            let once = normalize_time(input);
            assert_eq!(normalize_time(&once), once, "input {input:?}");
        }
    }

    #[test]
    fn meridiem_detection() {
        assert_eq!(Meridiem::detect("9 AM"), Some(Meridiem::Am));
        assert_eq!(Meridiem::detect("9 p.m."), Some(Meridiem::Pm));
        assert_eq!(Meridiem::detect("21:00"), None);
    }

    #[test]
    fn meridiem_shift_rule() {
        assert_eq!(Meridiem::Am.to_24h(12), 0);
        assert_eq!(Meridiem::Am.to_24h(7), 7);
        assert_eq!(Meridiem::Pm.to_24h(12), 12);
        assert_eq!(Meridiem::Pm.to_24h(1), 13);
        assert_eq!(Meridiem::Pm.to_24h(13), 13);
    }

    #[test]
    fn strategies_report_rejection() {
        assert_eq!(hour_only_meridiem("9:30 am", Some(Meridiem::Am)), ParseAttempt::Rejected);
        assert_eq!(manual_split("soon", None), ParseAttempt::Rejected);
        assert_eq!(
            manual_split("9 am", Some(Meridiem::Am)),
            ParseAttempt::Parsed(NaiveTime::from_hms_opt(9, 0, 0).unwrap())
        );
    }
}
