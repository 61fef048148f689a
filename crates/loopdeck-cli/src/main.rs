use std::fs::{self, File};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use loopdeck_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "loopdeck")]
#[command(author, version, about = "An infinitely looping zoom carousel")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TUI carousel
    Run {
        /// Card labels (defaults to a built-in deck)
        items: Vec<String>,
    },
    /// Drive the carousel headlessly through a scripted drag and report transitions
    Simulate {
        /// Number of frames to run
        #[arg(short, long, default_value_t = 600)]
        frames: u32,
        /// Print one JSON object per line instead of text
        #[arg(long)]
        json: bool,
        /// Card labels (defaults to a built-in deck)
        items: Vec<String>,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the default configuration file if none exists
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the configuration file path
    Path,
}

/// Where log output goes
enum LogTarget {
    Stderr,
    /// The TUI owns the terminal, so logs go to a file
    File,
}

fn init_logging(config: &AppConfig, target: LogTarget) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    match target {
        LogTarget::Stderr => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        LogTarget::File => {
            let path = config.log_path();
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let file = File::options().create(true).append(true).open(&path)?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config management must work even when the file on disk is invalid
    if let Some(Commands::Config { action }) = &cli.command {
        return match action {
            ConfigAction::Show => commands::config::show(&AppConfig::load()?),
            ConfigAction::Init { force } => commands::config::init(*force),
            ConfigAction::Path => commands::config::path(),
        };
    }

    // Load configuration
    let config = Arc::new(AppConfig::load()?);

    match cli.command {
        Some(Commands::Simulate { frames, json, items }) => {
            init_logging(&config, LogTarget::Stderr)?;
            commands::simulate::run(&config, frames, json, items)
        }
        Some(Commands::Run { items }) => {
            init_logging(&config, LogTarget::File)?;
            commands::run::run(config, items).await
        }
        Some(Commands::Config { .. }) | None => {
            init_logging(&config, LogTarget::File)?;
            commands::run::run(config, Vec::new()).await
        }
    }
}
