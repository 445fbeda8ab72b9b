//! `syfthub config`

use std::path::Path;

use syfthub_core::Config;

use crate::cli::{ConfigCommands, OutputFormat};
use crate::error::Result;

pub fn handle_config(
    command: &ConfigCommands,
    config: &Config,
    config_path: &Path,
    output: OutputFormat,
) -> Result<()> {
    match command {
        ConfigCommands::Path => match output {
            OutputFormat::Json => println!(
                "{}",
                serde_json::json!({
                    "path": config_path.display().to_string(),
                    "exists": config_path.exists(),
                })
            ),
            OutputFormat::Text => println!("{}", config_path.display()),
        },
        ConfigCommands::Show => match output {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(config)?),
            OutputFormat::Text => print!("{}", toml::to_string_pretty(config)?),
        },
    }

    Ok(())
}
