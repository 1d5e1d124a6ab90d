mod config;
mod extract_cmd;
mod mood_cmd;
mod normalize_cmd;
mod serve_cmd;
#[cfg(test)]
mod test_util;

use anyhow::Context;
use clap::{Parser, Subcommand};

use thinky_core::agent::{Agents, MoodAnalyzer};
use thinky_core::generator::{GeneratorKind, build_generator};

use config::{CliOverrides, ThinkyConfig};

#[derive(Parser)]
#[command(name = "thinky", about = "Mood-aware schedule and meal-plan service")]
struct Cli {
    /// Generator backend: claude-code or command (overrides THINKY_GENERATOR)
    #[arg(long, global = true)]
    generator: Option<GeneratorKind>,

    /// Generator binary (overrides THINKY_GENERATOR_BINARY)
    #[arg(long, global = true)]
    binary: Option<String>,

    /// Model name passed to the generator (overrides THINKY_MODEL)
    #[arg(long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a thinky config file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Run the HTTP API
    Serve {
        /// Address to bind (overrides THINKY_BIND)
        #[arg(long)]
        bind: Option<String>,
        /// Port to listen on (overrides THINKY_PORT)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Normalize clock times to 24-hour HH:MM
    Normalize {
        /// Times to normalize, e.g. "2:30 PM"
        #[arg(required = true)]
        times: Vec<String>,
    },
    /// Recover the JSON object from generator output
    Extract {
        /// File holding the generator output (defaults to stdin)
        file: Option<String>,
    },
    /// Analyze a mood description with the configured generator
    Mood {
        /// How you feel, in your own words
        text: String,
    },
}

/// Execute the `thinky init` command: write config file.
fn cmd_init(cli: &Cli, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let mut cfg = config::ConfigFile::default();
    if let Some(kind) = cli.generator {
        cfg.generator.kind = kind;
    }
    cfg.generator.binary = cli.binary.clone();
    cfg.generator.model = cli.model.clone();

    if cfg.generator.kind == GeneratorKind::Command && cfg.generator.binary.is_none() {
        anyhow::bail!("--binary is required with --generator command");
    }

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  generator.kind = {}", cfg.generator.kind);
    if let Some(binary) = &cfg.generator.binary {
        println!("  generator.binary = {binary}");
    }
    println!("  server = {}:{}", cfg.server.bind, cfg.server.port);
    println!();
    println!("Next: run `thinky serve` to start the API.");

    Ok(())
}

fn overrides(cli: &Cli) -> CliOverrides {
    CliOverrides {
        generator: cli.generator,
        binary: cli.binary.clone(),
        model: cli.model.clone(),
        ..Default::default()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Init { force } => {
            cmd_init(&cli, *force)?;
        }
        Commands::Serve { bind, port } => {
            let resolved = ThinkyConfig::resolve(&CliOverrides {
                bind: bind.clone(),
                port: *port,
                ..overrides(&cli)
            })?;
            let generator = build_generator(&resolved.generator)
                .context("failed to configure generator")?;
            tracing::info!(generator = generator.name(), "generator ready");
            serve_cmd::run_serve(Agents::new(generator), &resolved.bind, resolved.port).await?;
        }
        Commands::Normalize { times } => {
            normalize_cmd::run_normalize(times, &mut std::io::stdout().lock())?;
        }
        Commands::Extract { file } => {
            extract_cmd::run_extract(file.as_deref(), &mut std::io::stdout().lock())?;
        }
        Commands::Mood { text } => {
            let resolved = ThinkyConfig::resolve(&overrides(&cli))?;
            let generator = build_generator(&resolved.generator)
                .context("failed to configure generator")?;
            let analyzer = MoodAnalyzer::new(generator);
            mood_cmd::run_mood(&analyzer, text, &mut std::io::stdout().lock()).await?;
        }
    }

    Ok(())
}
