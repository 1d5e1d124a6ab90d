//! Configuration file management for thinky.
//!
//! Provides a TOML-based config file at `~/.config/thinky/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use thinky_core::generator::{GeneratorKind, GeneratorSettings};

pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8002;
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub generator: GeneratorSection,
    pub server: ServerSection,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSection {
    pub kind: GeneratorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binary: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub timeout_secs: u64,
}

impl Default for GeneratorSection {
    fn default() -> Self {
        Self {
            kind: GeneratorKind::default(),
            binary: None,
            args: Vec::new(),
            model: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub bind: String,
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the thinky config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/thinky` or `~/.config/thinky`,
/// never the platform-specific `dirs::config_dir()`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("thinky");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("thinky")
}

/// Return the path to the thinky config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    let path = config_path();
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file at {}", path.display()))
}

/// Load the config file if present. A missing file is not an error; a
/// present but unparseable file is.
pub fn load_config_if_present() -> Result<Option<ConfigFile>> {
    if config_path().exists() {
        load_config().map(Some)
    } else {
        Ok(None)
    }
}

/// Serialize and write the config file, creating parent dirs as needed.
/// Sets file permissions to 0600 on Unix.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Values given on the command line; `None` means "not given".
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub generator: Option<GeneratorKind>,
    pub binary: Option<String>,
    pub model: Option<String>,
    pub bind: Option<String>,
    pub port: Option<u16>,
}

/// Fully resolved configuration, ready for use.
#[derive(Debug, Clone, PartialEq)]
pub struct ThinkyConfig {
    pub generator: GeneratorSettings,
    pub bind: String,
    pub port: u16,
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl ThinkyConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - Generator kind: `--generator` > `THINKY_GENERATOR` > `generator.kind` > `claude-code`
    /// - Binary: `--binary` > `THINKY_GENERATOR_BINARY` > `generator.binary` > kind default
    /// - Model: `--model` > `THINKY_MODEL` > `generator.model` > none
    /// - Bind: `--bind` > `THINKY_BIND` > `server.bind` > `127.0.0.1`
    /// - Port: `--port` > `THINKY_PORT` > `server.port` > `8002`
    pub fn resolve(cli: &CliOverrides) -> Result<Self> {
        let file = load_config_if_present()?.unwrap_or_default();
        Self::resolve_with(cli, file)
    }

    fn resolve_with(cli: &CliOverrides, file: ConfigFile) -> Result<Self> {
        let kind = match (cli.generator, env_var("THINKY_GENERATOR")) {
            (Some(kind), _) => kind,
            (None, Some(raw)) => raw
                .parse::<GeneratorKind>()
                .map_err(anyhow::Error::msg)
                .context("THINKY_GENERATOR env var is invalid")?,
            (None, None) => file.generator.kind,
        };

        let binary = cli
            .binary
            .clone()
            .or_else(|| env_var("THINKY_GENERATOR_BINARY"))
            .or(file.generator.binary);

        let model = cli
            .model
            .clone()
            .or_else(|| env_var("THINKY_MODEL"))
            .or(file.generator.model);

        let bind = cli
            .bind
            .clone()
            .or_else(|| env_var("THINKY_BIND"))
            .unwrap_or(file.server.bind);

        let port = match (cli.port, env_var("THINKY_PORT")) {
            (Some(port), _) => port,
            (None, Some(raw)) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("THINKY_PORT env var is not a valid port: {raw:?}"))?,
            (None, None) => file.server.port,
        };

        anyhow::ensure!(
            file.generator.timeout_secs > 0,
            "generator.timeout_secs must be at least 1, got 0"
        );

        Ok(Self {
            generator: GeneratorSettings {
                kind,
                binary,
                args: file.generator.args,
                model,
                timeout: Duration::from_secs(file.generator.timeout_secs),
            },
            bind,
            port,
        })
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
