//! CLI structure and command definitions

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line companion for the SyftHub SDK
#[derive(Parser, Debug)]
#[command(name = "syfthub")]
#[command(version, about = "Inspect the local SyftBox runtime used by the SyftHub SDK")]
#[command(long_about = "
Inspect the local SyftBox runtime used by the SyftHub SDK

EXAMPLES:
    # Check whether the runtime is up and the account is configured
    syfthub status

    # List datasites synced to this machine
    syfthub datasites -o json

    # Show where the config file lives
    syfthub config path
")]
pub struct Cli {
    /// Path to alternate configuration file
    #[arg(long, global = true, env = "SYFTHUB_CONFIG_FILE")]
    pub config_file: Option<String>,

    /// Output format
    #[arg(long, short = 'o', global = true, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Enable verbose logging
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show runtime and account status
    Status,

    /// List datasites synced by the local runtime
    #[command(alias = "ds")]
    Datasites,

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the configuration file path
    Path,
    /// Print the effective configuration
    Show,
}

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
