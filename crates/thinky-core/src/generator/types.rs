//! Types shared by generator implementations.

use thiserror::Error;

/// Failures of the external generation collaborator.
///
/// These are never conflated with [`crate::extract::ExtractionError`]: a
/// `GenerationError` means no usable response text was obtained at all.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("failed to spawn generator binary {binary:?}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("generator I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("generator timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("generator exited with code {code:?}: {stderr}")]
    NonZeroExit { code: Option<i32>, stderr: String },

    #[error("generator reported an error: {0}")]
    Upstream(String),

    #[error("generator returned an empty response")]
    EmptyResponse,
}

/// Longest stderr excerpt carried in a [`GenerationError::NonZeroExit`].
pub(crate) const STDERR_EXCERPT: usize = 2048;

/// Trimmed, length-capped text of a child's stderr.
pub(crate) fn stderr_excerpt(stderr: &[u8]) -> String {
    String::from_utf8_lossy(stderr)
        .trim()
        .chars()
        .take(STDERR_EXCERPT)
        .collect()
}

/// A single event decoded from a streaming generator's output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Incremental assistant text.
    Text(String),
    /// The final answer for the whole run.
    Result(String),
    /// The collaborator reported a failure.
    Error(String),
}
