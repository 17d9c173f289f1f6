//! quickcal CLI entry point.

use std::process::ExitCode;

use clap::Parser;

use quickcal_cli::cli::{Cli, Command};
use quickcal_cli::config::ClientConfig;
use quickcal_cli::error::{ClientError, ClientResult};
use quickcal_core::{TracingConfig, init_tracing};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let tracing_config = if cli.debug {
        TracingConfig::cli_debug()
    } else {
        TracingConfig::cli()
    };
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("warning: failed to initialize logging: {}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    // An explicit --config path must parse; the default path is best-effort.
    let config = if let Some(ref path) = cli.config {
        ClientConfig::load_from(path).map_err(ClientError::Config)?
    } else {
        ClientConfig::load().unwrap_or_default()
    };

    match cli.command {
        Command::Add { ref text } => quickcal_cli::commands::add::run(&cli, &config, text).await,
        Command::Next => quickcal_cli::commands::next::run(&cli, &config).await,
        Command::Today => quickcal_cli::commands::today::run(&cli, &config).await,
    }
}
