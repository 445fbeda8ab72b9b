use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use syfthub_core::Config;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod error;

use cli::{Cli, Commands};
use error::SyftHubError;

// No `#[tokio::main]`: async operations run through the syfthub-core bridge.
fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level
    init_tracing(cli.verbose);

    if let Err(e) = execute_command(&cli) {
        e.print_diagnostic();
        std::process::exit(1);
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    // Check for RUST_LOG env var first, then fall back to verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "syfthub=warn,syfthub_core=warn",
            1 => "syfthub=info,syfthub_core=info",
            2 => "syfthub=debug,syfthub_core=debug",
            _ => "syfthub=trace,syfthub_core=trace",
        };
        tracing_subscriber::EnvFilter::new(level)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_names(true)
                .compact(),
        )
        .init();

    debug!("Tracing initialized with verbosity level: {}", verbose);
}

fn resolve_config_path(cli: &Cli) -> Result<PathBuf, SyftHubError> {
    match &cli.config_file {
        Some(path) => Ok(PathBuf::from(path)),
        None => Ok(Config::config_path()?),
    }
}

fn execute_command(cli: &Cli) -> Result<(), SyftHubError> {
    let config_path = resolve_config_path(cli)?;
    debug!("Loading config from {}", config_path.display());
    let config = Config::load_from_path(&config_path)?;

    info!("Command: {:?}", cli.command);
    let start = std::time::Instant::now();

    let result = match &cli.command {
        Commands::Status => commands::status::handle_status(&config, cli.output),
        Commands::Datasites => commands::datasites::handle_datasites(&config, cli.output),
        Commands::Config(command) => {
            commands::config::handle_config(command, &config, &config_path, cli.output)
        }
    };

    debug!("Command completed in {:?}", start.elapsed());
    result
}
