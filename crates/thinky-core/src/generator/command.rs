//! Generic command generator.
//!
//! Runs any binary that reads a prompt on stdin and prints the answer on
//! stdout, e.g. `ollama run llama3` or `llm -m gpt-4o-mini`.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use super::claude_code::DEFAULT_TIMEOUT;
use super::trait_def::Generator;
use super::types::{GenerationError, stderr_excerpt};

#[derive(Debug, Clone)]
pub struct CommandGenerator {
    binary: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandGenerator {
    pub fn new(binary: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            binary: binary.into(),
            args,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn run(&self, prompt: &str) -> Result<String, GenerationError> {
        let mut child = Command::new(&self.binary)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| GenerationError::Spawn {
                binary: self.binary.clone(),
                source,
            })?;

        let stdin = child.stdin.take();
        let write_prompt = async move {
            let Some(mut stdin) = stdin else {
                return Ok::<(), std::io::Error>(());
            };
            stdin.write_all(prompt.as_bytes()).await?;
            stdin.shutdown().await
        };

        // The child may write while it reads, so its output is drained
        // concurrently with the prompt write.
        let (written, output) = tokio::join!(write_prompt, child.wait_with_output());
        match written {
            // A command that exits without reading its input is judged by
            // its exit status below, not by the broken pipe.
            Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                debug!("generator command closed stdin early");
            }
            other => other?,
        }

        let output = output?;
        if !output.status.success() {
            return Err(GenerationError::NonZeroExit {
                code: output.status.code(),
                stderr: stderr_excerpt(&output.stderr),
            });
        }

        let response = String::from_utf8_lossy(&output.stdout).into_owned();
        if response.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(response)
    }
}

#[async_trait]
impl Generator for CommandGenerator {
    fn name(&self) -> &str {
        "command"
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        debug!(binary = %self.binary, prompt_len = prompt.len(), "invoking generator command");
        tokio::time::timeout(self.timeout, self.run(prompt))
            .await
            .map_err(|_| GenerationError::Timeout {
                secs: self.timeout.as_secs(),
            })?
    }
}
