//! calbridge CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use calbridge_cli::cli::{Cli, Command, ConfigAction};
use calbridge_cli::config::CliConfig;
use calbridge_cli::error::{CliError, CliResult};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.debug {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(Level::WARN.to_string()))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    // Load configuration
    let config = if let Some(ref path) = cli.config {
        CliConfig::load_from(path).map_err(CliError::Config)?
    } else {
        CliConfig::load().unwrap_or_default()
    };

    match &cli.command {
        Some(Command::Config { action }) => match action {
            ConfigAction::Dump => calbridge_cli::commands::config::dump(&config),
            ConfigAction::Validate => calbridge_cli::commands::config::validate(&config),
            ConfigAction::Path => calbridge_cli::commands::config::path(),
        },
        None => {
            // clap guarantees both positionals when no subcommand is given.
            let (Some(source), Some(output)) = (cli.source.clone(), cli.output.clone()) else {
                return Err(CliError::Config(
                    "a feed source and an output path are required".to_string(),
                ));
            };
            calbridge_cli::commands::process::run(&source, &output, &cli, &config).await
        }
    }
}
