//! Binary entry point for noteport.
//!
//! This binary provides the CLI for exporting and importing note templates.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

mod commands;

use clap::{Parser, Subcommand};
use noteport::config::{CONFIG_PATH_ENV, NoteportConfig};
use noteport::observability;
use std::path::PathBuf;
use std::process::ExitCode;

/// Noteport - export and import note templates.
#[derive(Parser)]
#[command(name = "noteport")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Export every template to a JSON file.
    Export {
        /// Directory to write the export into.
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Import templates from an export file.
    Import {
        /// Export file (.json).
        file: PathBuf,

        /// Validate the file without creating any template.
        #[arg(long)]
        dry_run: bool,
    },

    /// Manage configuration.
    Config {
        /// Show current configuration.
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is not an error
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) = observability::init_from_settings(config.logging.as_ref(), cli.verbose) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(message) = failure_message(e.as_ref()) {
                eprintln!("{message}");
            }
            ExitCode::FAILURE
        },
    }
}

/// Returns the line to print for a failed command, or `None` when the
/// notifier already told the user.
fn failure_message(error: &(dyn std::error::Error + 'static)) -> Option<String> {
    if error.is::<commands::AlreadyReported>() {
        None
    } else {
        Some(format!("Error: {error}"))
    }
}

/// Runs the selected command.
async fn run_command(cli: Cli, config: NoteportConfig) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Export { output_dir } => commands::cmd_export(&config, output_dir).await,
        Commands::Import { file, dry_run } => {
            commands::cmd_import(&config, file, dry_run, cli.verbose).await
        },
        Commands::Config { show } => commands::cmd_config(&config, show),
    }
}

/// Loads configuration: `--config`, then `NOTEPORT_CONFIG_PATH`, then the
/// default location, with environment overrides applied last.
fn load_config(path: Option<&std::path::Path>) -> Result<NoteportConfig, Box<dyn std::error::Error>> {
    let mut config = if let Some(config_path) = path {
        NoteportConfig::load_from_file(config_path)?
    } else {
        match std::env::var(CONFIG_PATH_ENV) {
            Ok(config_path) if !config_path.trim().is_empty() => {
                NoteportConfig::load_from_file(std::path::Path::new(&config_path))?
            },
            _ => NoteportConfig::load_default(),
        }
    };

    config.apply_env_overrides()?;
    Ok(config)
}
