//! Claude Code generator.
//!
//! Runs `claude -p <prompt> --output-format stream-json` as a subprocess and
//! decodes its JSONL output into [`StreamEvent`] values. The final `result`
//! event is the response; if none arrives, the concatenated assistant text
//! is used instead.

use std::process::Stdio;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, warn};

use super::trait_def::Generator;
use super::types::{GenerationError, StreamEvent, stderr_excerpt};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Generator backed by the [Claude Code](https://docs.anthropic.com/en/docs/claude-code) CLI.
#[derive(Debug, Clone)]
pub struct ClaudeCodeGenerator {
    /// Path to the `claude` binary. Defaults to `"claude"` (found via `$PATH`).
    claude_binary_path: String,
    /// Model override passed as `--model`.
    model: Option<String>,
    timeout: Duration,
}

impl ClaudeCodeGenerator {
    /// Create a generator that will look for `claude` on `$PATH`.
    pub fn new() -> Self {
        Self::with_binary("claude")
    }

    /// Create a generator with a custom binary path.
    ///
    /// Useful for testing or when `claude` is installed in a non-standard
    /// location.
    pub fn with_binary(path: impl Into<String>) -> Self {
        Self {
            claude_binary_path: path.into(),
            model: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn command(&self, prompt: &str) -> Command {
        let mut cmd = Command::new(&self.claude_binary_path);
        cmd.arg("-p")
            .arg(prompt)
            .arg("--output-format")
            .arg("stream-json")
            .arg("--verbose");
        if let Some(model) = &self.model {
            cmd.arg("--model").arg(model);
        }
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    async fn run(&self, prompt: &str) -> Result<String, GenerationError> {
        let mut child = self
            .command(prompt)
            .spawn()
            .map_err(|source| GenerationError::Spawn {
                binary: self.claude_binary_path.clone(),
                source,
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| GenerationError::Upstream("child process has no stdout".into()))?;

        // Drained on its own task so a chatty stderr never blocks stdout.
        let stderr_task = child.stderr.take().map(|mut stderr| {
            tokio::spawn(async move {
                let mut buf = Vec::new();
                if let Err(e) = stderr.read_to_end(&mut buf).await {
                    debug!("failed to read claude stderr: {e}");
                }
                buf
            })
        });

        let mut events = Box::pin(stream_events(stdout));
        let mut text = String::new();
        let mut result = None;
        while let Some(event) = events.next().await {
            match event {
                StreamEvent::Text(chunk) => text.push_str(&chunk),
                StreamEvent::Result(final_text) => result = Some(final_text),
                StreamEvent::Error(message) => return Err(GenerationError::Upstream(message)),
            }
        }

        let status = child.wait().await?;
        if !status.success() {
            let stderr = match stderr_task {
                Some(task) => task.await.unwrap_or_default(),
                None => Vec::new(),
            };
            return Err(GenerationError::NonZeroExit {
                code: status.code(),
                stderr: stderr_excerpt(&stderr),
            });
        }

        let response = result.unwrap_or(text);
        if response.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(response)
    }
}

impl Default for ClaudeCodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// JSONL parsing helpers
// ---------------------------------------------------------------------------

/// Parse a single JSONL line from Claude Code's stream-json output into
/// zero or more `StreamEvent` values.
///
/// Returns `Err` if the line is not valid JSON. Callers should treat `Err`
/// as a warning and continue reading.
fn parse_stream_json_line(line: &str) -> Result<Vec<StreamEvent>> {
    let v: serde_json::Value =
        serde_json::from_str(line).context("malformed JSON in stream output")?;

    let mut events = Vec::new();
    let event_type = v.get("type").and_then(|t| t.as_str()).unwrap_or("");

    match event_type {
        "assistant" => {
            let blocks = v
                .get("message")
                .and_then(|m| m.get("content"))
                .and_then(|c| c.as_array());
            for block in blocks.into_iter().flatten() {
                if block.get("type").and_then(|t| t.as_str()) == Some("text") {
                    if let Some(text) = block.get("text").and_then(|t| t.as_str()) {
                        events.push(StreamEvent::Text(text.to_string()));
                    }
                }
            }
        }

        "result" => {
            let is_error = v.get("is_error").and_then(|e| e.as_bool()).unwrap_or(false);
            let text = v.get("result").and_then(|r| r.as_str());
            match (is_error, text) {
                (true, Some(text)) => events.push(StreamEvent::Error(text.to_string())),
                (true, None) => events.push(StreamEvent::Error("run ended in error".into())),
                (false, Some(text)) => events.push(StreamEvent::Result(text.to_string())),
                (false, None) => {}
            }
        }

        "error" => {
            let message = v
                .get("error")
                .and_then(|e| e.get("message").and_then(|m| m.as_str()))
                .or_else(|| v.get("message").and_then(|m| m.as_str()))
                .unwrap_or("unknown error")
                .to_string();
            events.push(StreamEvent::Error(message));
        }

        other => {
            debug!(event_type = other, "ignoring stream-json event type");
        }
    }

    Ok(events)
}

/// Read JSONL from `reader` and yield decoded events until EOF.
///
/// Malformed lines are skipped with a warning; a read error ends the
/// stream with a [`StreamEvent::Error`].
fn stream_events<R>(reader: R) -> impl Stream<Item = StreamEvent> + Send
where
    R: AsyncRead + Unpin + Send + 'static,
{
    async_stream::stream! {
        let mut lines = BufReader::new(reader).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    match parse_stream_json_line(trimmed) {
                        Ok(events) => {
                            for event in events {
                                yield event;
                            }
                        }
                        Err(e) => {
                            warn!(line = trimmed, error = %e, "skipping malformed JSONL line");
                        }
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "error reading generator stdout");
                    yield StreamEvent::Error(format!("stdout read error: {e}"));
                    break;
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Generator trait implementation
// ---------------------------------------------------------------------------

#[async_trait]
impl Generator for ClaudeCodeGenerator {
    fn name(&self) -> &str {
        "claude-code"
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        debug!(prompt_len = prompt.len(), model = ?self.model, "invoking claude");
        tokio::time::timeout(self.timeout, self.run(prompt))
            .await
            .map_err(|_| GenerationError::Timeout {
                secs: self.timeout.as_secs(),
            })?
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Write an executable shell script standing in for `claude`.
    fn fake_claude(dir: &std::path::Path, body: &str) -> String {
        let path = dir.join("fake_claude.sh");
        std::fs::write(&path, format!("#!/bin/sh\n{body}")).unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        }
        path.to_str().unwrap().to_string()
    }

    // -- JSONL parsing tests -----------------------------------------------

    #[test]
    fn parse_assistant_text_blocks() {
        let line = r#"{"type":"assistant","message":{"content":[{"type":"text","text":"Hello"},{"type":"tool_use","name":"Bash","input":{}},{"type":"text","text":" world"}]}}"#;
        let events = parse_stream_json_line(line).unwrap();
        assert_eq!(
            events,
            vec![
                StreamEvent::Text("Hello".to_string()),
                StreamEvent::Text(" world".to_string()),
            ]
        );
    }

    #[test]
    fn parse_result() {
        let line = r#"{"type":"result","subtype":"success","is_error":false,"result":"{\"a\":1}"}"#;
        let events = parse_stream_json_line(line).unwrap();
        assert_eq!(events, vec![StreamEvent::Result("{\"a\":1}".to_string())]);
    }

    #[test]
    fn parse_result_with_error_flag() {
        let line = r#"{"type":"result","is_error":true,"result":"credit balance too low"}"#;
        let events = parse_stream_json_line(line).unwrap();
        assert_eq!(
            events,
            vec![StreamEvent::Error("credit balance too low".to_string())]
        );
    }

    #[test]
    fn parse_error_type() {
        let line = r#"{"type":"error","error":{"message":"rate limit exceeded"}}"#;
        let events = parse_stream_json_line(line).unwrap();
        assert_eq!(
            events,
            vec![StreamEvent::Error("rate limit exceeded".to_string())]
        );
    }

    #[test]
    fn parse_error_type_flat() {
        let line = r#"{"type":"error","message":"something broke"}"#;
        let events = parse_stream_json_line(line).unwrap();
        assert_eq!(events, vec![StreamEvent::Error("something broke".to_string())]);
    }

    #[test]
    fn parse_unknown_type_returns_empty() {
        let line = r#"{"type":"system","subtype":"init"}"#;
        assert!(parse_stream_json_line(line).unwrap().is_empty());
    }

    #[test]
    fn parse_malformed_json_returns_error() {
        assert!(parse_stream_json_line("this is not json").is_err());
    }

    // -- Subprocess tests ----------------------------------------------------

    #[cfg(unix)]
    #[tokio::test]
    async fn result_event_is_the_response() {
        let tmp = tempfile::tempdir().unwrap();
        let binary = fake_claude(
            tmp.path(),
            "echo '{\"type\":\"system\",\"subtype\":\"init\"}'\n\
             echo 'not json at all'\n\
             echo '{\"type\":\"assistant\",\"message\":{\"content\":[{\"type\":\"text\",\"text\":\"thinking\"}]}}'\n\
             printf '%s\\n' '{\"type\":\"result\",\"is_error\":false,\"result\":\"{\\\"Energy\\\": \\\"High\\\"}\"}'\n",
        );

        let generator = ClaudeCodeGenerator::with_binary(binary);
        let response = generator.generate("how do I feel?").await.unwrap();
        assert_eq!(response, r#"{"Energy": "High"}"#);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn assistant_text_is_used_without_result() {
        let tmp = tempfile::tempdir().unwrap();
        let binary = fake_claude(
            tmp.path(),
            "echo '{\"type\":\"assistant\",\"message\":{\"content\":[{\"type\":\"text\",\"text\":\"part one, \"}]}}'\n\
             echo '{\"type\":\"assistant\",\"message\":{\"content\":[{\"type\":\"text\",\"text\":\"part two\"}]}}'\n",
        );

        let generator = ClaudeCodeGenerator::with_binary(binary);
        assert_eq!(generator.generate("p").await.unwrap(), "part one, part two");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn prompt_is_passed_as_argument() {
        let tmp = tempfile::tempdir().unwrap();
        let binary = fake_claude(
            tmp.path(),
            "printf '{\"type\":\"result\",\"result\":\"%s|%s\"}\\n' \"$1\" \"$2\"\n",
        );

        let generator = ClaudeCodeGenerator::with_binary(binary);
        assert_eq!(generator.generate("hello").await.unwrap(), "-p|hello");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn error_event_is_upstream_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let binary = fake_claude(
            tmp.path(),
            "echo '{\"type\":\"error\",\"message\":\"overloaded\"}'\n",
        );

        let generator = ClaudeCodeGenerator::with_binary(binary);
        let err = generator.generate("p").await.unwrap_err();
        assert!(
            matches!(err, GenerationError::Upstream(ref m) if m == "overloaded"),
            "unexpected error: {err:?}"
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn nonzero_exit_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let binary = fake_claude(tmp.path(), "echo 'not logged in' >&2\nexit 3\n");

        let generator = ClaudeCodeGenerator::with_binary(binary);
        let err = generator.generate("p").await.unwrap_err();
        match err {
            GenerationError::NonZeroExit { code, stderr } => {
                assert_eq!(code, Some(3));
                assert_eq!(stderr, "not logged in");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn empty_output_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let binary = fake_claude(tmp.path(), "true\n");

        let generator = ClaudeCodeGenerator::with_binary(binary);
        assert!(matches!(
            generator.generate("p").await,
            Err(GenerationError::EmptyResponse)
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn slow_generator_times_out() {
        let tmp = tempfile::tempdir().unwrap();
        let binary = fake_claude(tmp.path(), "sleep 5\n");

        let generator =
            ClaudeCodeGenerator::with_binary(binary).timeout(Duration::from_millis(200));
        assert!(matches!(
            generator.generate("p").await,
            Err(GenerationError::Timeout { .. })
        ));
    }

    #[tokio::test]
    async fn missing_binary_fails_to_spawn() {
        let generator = ClaudeCodeGenerator::with_binary("/nonexistent/path/to/claude");
        assert!(matches!(
            generator.generate("p").await,
            Err(GenerationError::Spawn { .. })
        ));
    }
}
