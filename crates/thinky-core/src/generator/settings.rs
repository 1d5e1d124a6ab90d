//! Generator selection from resolved settings.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use super::claude_code::{ClaudeCodeGenerator, DEFAULT_TIMEOUT};
use super::command::CommandGenerator;
use super::trait_def::Generator;

/// Which generator implementation to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeneratorKind {
    #[default]
    ClaudeCode,
    Command,
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClaudeCode => f.write_str("claude-code"),
            Self::Command => f.write_str("command"),
        }
    }
}

impl FromStr for GeneratorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "claude-code" => Ok(Self::ClaudeCode),
            "command" => Ok(Self::Command),
            other => Err(format!(
                "unknown generator kind {other:?} (expected claude-code or command)"
            )),
        }
    }
}

/// Everything needed to construct a [`Generator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorSettings {
    pub kind: GeneratorKind,
    /// Binary to run. `None` means the kind's default (`claude`); required
    /// for [`GeneratorKind::Command`].
    pub binary: Option<String>,
    /// Extra arguments for [`GeneratorKind::Command`].
    pub args: Vec<String>,
    /// Model override for [`GeneratorKind::ClaudeCode`].
    pub model: Option<String>,
    pub timeout: Duration,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            kind: GeneratorKind::default(),
            binary: None,
            args: Vec::new(),
            model: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Construct the generator described by `settings`.
pub fn build_generator(settings: &GeneratorSettings) -> Result<Arc<dyn Generator>> {
    let generator: Arc<dyn Generator> = match settings.kind {
        GeneratorKind::ClaudeCode => {
            let base = match &settings.binary {
                Some(binary) => ClaudeCodeGenerator::with_binary(binary.clone()),
                None => ClaudeCodeGenerator::new(),
            };
            Arc::new(
                base.model(settings.model.clone())
                    .timeout(settings.timeout),
            )
        }
        GeneratorKind::Command => {
            let Some(binary) = &settings.binary else {
                bail!("generator kind `command` requires a binary");
            };
            Arc::new(
                CommandGenerator::new(binary.clone(), settings.args.clone())
                    .timeout(settings.timeout),
            )
        }
    };
    Ok(generator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_and_displays() {
        for kind in [GeneratorKind::ClaudeCode, GeneratorKind::Command] {
            assert_eq!(kind.to_string().parse::<GeneratorKind>(), Ok(kind));
        }
        assert!("openai".parse::<GeneratorKind>().is_err());
    }

    #[test]
    fn default_settings_build_claude_code() {
        let generator = build_generator(&GeneratorSettings::default()).unwrap();
        assert_eq!(generator.name(), "claude-code");
    }

    #[test]
    fn command_kind_requires_binary() {
        let settings = GeneratorSettings {
            kind: GeneratorKind::Command,
            ..GeneratorSettings::default()
        };
        let err = build_generator(&settings).err().expect("should fail");
        assert!(err.to_string().contains("requires a binary"));
    }

    #[test]
    fn command_kind_builds_with_binary() {
        let settings = GeneratorSettings {
            kind: GeneratorKind::Command,
            binary: Some("ollama".to_string()),
            args: vec!["run".to_string(), "llama3".to_string()],
            ..GeneratorSettings::default()
        };
        assert_eq!(build_generator(&settings).unwrap().name(), "command");
    }
}
