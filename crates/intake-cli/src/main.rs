mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "intake")]
#[command(version, about = "Intake CLI - validated form schemas and submissions", long_about = None)]
struct Cli {
    /// Log form transitions (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that a form config's schema compiles
    Check {
        /// Path to the form config (TOML)
        config: PathBuf,
    },

    /// Run one submission through the form and print values and errors
    Submit {
        /// Path to the form config (TOML)
        config: PathBuf,

        /// JSON file with the submitted entries (object or [name, value] pairs)
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Entries given inline as name=value
        #[arg(value_name = "NAME=VALUE")]
        entries: Vec<String>,
    },

    /// Replay a JSON Lines log of focus, blur and submit events
    Replay {
        /// Path to the form config (TOML)
        config: PathBuf,

        /// Event log, one JSON object per line
        events: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Execute command
    match cli.command {
        Commands::Check { config } => {
            commands::check::execute(&config)?;
        }
        Commands::Submit { config, data, entries } => {
            commands::submit::execute(&config, data.as_deref(), &entries)?;
        }
        Commands::Replay { config, events } => {
            commands::replay::execute(&config, &events)?;
        }
    }

    Ok(())
}
