// SPDX-FileCopyrightText: 2026 Credman Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! credman - store application configs in the native credential vault.
//!
//! This is the binary entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use credman::{NOT_FOUND_MESSAGE, Outcome};
use credman_config::CredmanConfig;
use credman_core::CredmanError;

/// credman - store application configs in the native credential vault.
#[derive(Parser, Debug)]
#[command(name = "credman", version, about, long_about = None)]
struct Cli {
    /// Settings file to load instead of the standard locations.
    #[arg(long = "config", global = true, value_name = "PATH")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Store a config under an application name, replacing any earlier one.
    #[command(visible_alias = "init")]
    Set {
        /// Application name the config is stored under.
        name: String,
        /// Path to a JSON file, inline JSON, or Base64 text.
        #[arg(value_name = "CONFIG")]
        input: String,
        /// User name recorded with the credential.
        #[arg(long)]
        user: Option<String>,
    },
    /// Print the stored config for an application name.
    Get {
        /// Application name to look up.
        name: String,
    },
    /// Remove the stored config for an application name.
    Delete {
        /// Application name to remove.
        name: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match cli.settings.as_deref() {
        Some(path) => credman_config::load_and_validate_path(path),
        None => credman_config::load_and_validate(),
    };
    let settings = match loaded {
        Ok(settings) => settings,
        Err(errors) => {
            credman_config::render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&settings.logging.level);

    match run(cli.command, &settings) {
        Ok(outcome) => {
            if outcome == Outcome::NotFound {
                eprintln!("{NOT_FOUND_MESSAGE}");
            }
            ExitCode::from(outcome.exit_code())
        }
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands, settings: &CredmanConfig) -> Result<Outcome, CredmanError> {
    let store = credman_store::open_native()?;

    match command {
        Commands::Set { name, input, user } => {
            let user_name = credman::resolve_user(user.as_deref(), settings)?;
            credman::run_set(&store, &name, &input, &user_name)
        }
        Commands::Get { name } => credman::run_get(&store, &name, &mut std::io::stdout().lock()),
        Commands::Delete { name } => credman::run_delete(&store, &name),
    }
}

/// Initializes the tracing subscriber on stderr with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let level = log_level.trim().to_ascii_lowercase();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "credman={level},credman_config={level},credman_store={level},warn"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}
