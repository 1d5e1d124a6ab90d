//! Recover a JSON object from free-form generation text.
//!
//! Models are asked for "a JSON string" and answer with anything from bare
//! JSON to a chatty paragraph wrapping a fenced code block. Candidates are
//! tried in a fixed order and the first one that parses as a complete JSON
//! object wins:
//!
//! 1. the whole (trimmed) text;
//! 2. the body of the first fenced code block, then every top-level
//!    `{ ... }` span inside it;
//! 3. every top-level `{ ... }` span in the whole text.
//!
//! Brace matching respects string literals, so `"}"` inside a value does
//! not close an object. Nothing is ever partially parsed: a candidate
//! either deserializes completely or is discarded.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

const FENCE: &str = "```";

/// Why no JSON object could be recovered.
///
/// Distinct from an empty object: `{}` is a successful extraction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("generation response was empty")]
    Empty,

    #[error("no JSON object found in generation response")]
    NotFound,

    #[error("JSON object in generation response is unterminated")]
    Unterminated,

    #[error("none of {candidates} JSON candidate(s) in generation response parsed: {last_error}")]
    Malformed {
        candidates: usize,
        last_error: String,
    },
}

/// Extract the JSON object embedded in `raw`.
///
/// ```
/// use thinky_core::extract::extract_json;
///
/// let obj = extract_json("Sure! Here's the plan: {\"a\": 1}").unwrap();
/// assert_eq!(obj["a"], 1);
/// assert!(extract_json("I could not generate a plan.").is_err());
/// ```
pub fn extract_json(raw: &str) -> Result<Map<String, Value>, ExtractionError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(ExtractionError::Empty);
    }

    if let Ok(object) = parse_object(text) {
        return Ok(object);
    }

    let mut candidates: Vec<&str> = Vec::new();
    let mut unterminated = false;

    if let Some(body) = fenced_body(text) {
        candidates.push(body.trim());
        let scan = scan_objects(body);
        unterminated |= scan.unterminated;
        candidates.extend(scan.spans);
    }

    let scan = scan_objects(text);
    unterminated |= scan.unterminated;
    candidates.extend(scan.spans);

    let mut attempted = 0usize;
    let mut last_error = None;
    for candidate in candidates.into_iter().filter(|c| !c.is_empty()) {
        attempted += 1;
        match parse_object(candidate) {
            Ok(object) => return Ok(object),
            Err(e) => {
                debug!(error = %e, "discarding JSON candidate");
                last_error = Some(e);
            }
        }
    }

    match last_error {
        Some(last_error) => Err(ExtractionError::Malformed {
            candidates: attempted,
            last_error,
        }),
        None if unterminated => Err(ExtractionError::Unterminated),
        None => Err(ExtractionError::NotFound),
    }
}

/// Parse `s` as a JSON value that must be an object.
fn parse_object(s: &str) -> Result<Map<String, Value>, String> {
    match serde_json::from_str::<Value>(s) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(other) => Err(format!("top-level value is {}, not an object", kind(&other))),
        Err(e) => Err(e.to_string()),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Body of the first fenced code block, without the language label.
///
/// A fence with no closing marker runs to the end of the text (truncated
/// responses).
fn fenced_body(text: &str) -> Option<&str> {
    let open = text.find(FENCE)?;
    let rest = &text[open + FENCE.len()..];

    let body = match rest.find('\n') {
        Some(nl) if is_fence_label(&rest[..nl]) => &rest[nl + 1..],
        _ => rest,
    };

    Some(match body.find(FENCE) {
        Some(close) => &body[..close],
        None => body,
    })
}

/// `json`, `JSON`, `jsonc`, or nothing at all.
fn is_fence_label(line: &str) -> bool {
    line.trim()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Result of a balanced-brace scan.
#[derive(Debug, Default, PartialEq, Eq)]
struct BraceScan<'a> {
    /// Every complete top-level `{ ... }` span, in order.
    spans: Vec<&'a str>,
    /// An object was opened but never closed.
    unterminated: bool,
}

/// Find top-level `{ ... }` spans, ignoring braces inside string literals.
///
/// Quotes are only tracked inside an object; prose outside JSON is free to
/// contain unbalanced quotes and apostrophes. A brace that never closes and
/// does not open a JSON member (`:-{`, `"{"`) is treated as prose, and the
/// scan resumes just after it.
fn scan_objects(text: &str) -> BraceScan<'_> {
    let mut scan = BraceScan::default();
    let mut offset = 0usize;

    loop {
        let rest = &text[offset..];
        let (spans, open) = scan_pass(rest);
        if !spans.is_empty() {
            scan.unterminated = false;
        }
        scan.spans.extend(spans);

        let Some(open) = open else {
            break;
        };
        scan.unterminated = true;
        if opens_json_member(&rest[open + 1..]) {
            break;
        }
        offset += open + 1;
    }

    scan
}

/// One left-to-right pass: the closed spans, and the start of a top-level
/// brace still open at the end of the text.
fn scan_pass(text: &str) -> (Vec<&str>, Option<usize>) {
    let mut spans = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' if depth > 0 => in_string = true,
            '{' => {
                if depth == 0 {
                    start = i;
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    spans.push(&text[start..=i]);
                }
            }
            _ => {}
        }
    }

    (spans, (depth > 0).then_some(start))
}

/// Whether the text after a `{` starts like a JSON object body: `}` or a
/// string key followed by `:`. A truncated object starts this way; a brace
/// in prose does not.
fn opens_json_member(after_brace: &str) -> bool {
    let body = after_brace.trim_start();
    if body.starts_with('}') {
        return true;
    }
    let Some(key) = body.strip_prefix('"') else {
        return false;
    };

    let mut escaped = false;
    for (i, c) in key.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => return key[i + 1..].trim_start().starts_with(':'),
            _ => {}
        }
    }
    // The key itself was cut off.
    true
}
