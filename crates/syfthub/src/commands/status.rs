//! `syfthub status`

use serde::Serialize;
use syfthub_core::{AccountAware, Config, RuntimeClient};
use tracing::debug;

use crate::cli::OutputFormat;
use crate::commands::build_service;
use crate::error::Result;

/// Snapshot of the local runtime and account state
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub email: String,
    pub data_dir: String,
    pub datasite: String,
    pub runtime_running: bool,
    pub account_configured: bool,
}

pub fn collect(config: &Config) -> Result<StatusReport> {
    let service = build_service(config)?;
    let client = service.client();

    Ok(StatusReport {
        email: client.email().to_string(),
        data_dir: client.data_dir().display().to_string(),
        datasite: client.my_datasite().display().to_string(),
        runtime_running: client.is_running(),
        account_configured: service.account_configured(),
    })
}

pub fn handle_status(config: &Config, output: OutputFormat) -> Result<()> {
    let report = collect(config)?;
    debug!(?report, "Collected status");

    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            println!("Email:       {}", report.email);
            println!("Data dir:    {}", report.data_dir);
            println!("Datasite:    {}", report.datasite);
            println!("Runtime:     {}", running_label(report.runtime_running));
            println!("Account:     {}", configured_label(report.account_configured));
        }
    }

    Ok(())
}

fn running_label(running: bool) -> &'static str {
    if running { "running" } else { "not running" }
}

fn configured_label(configured: bool) -> &'static str {
    if configured {
        "configured"
    } else {
        "not configured"
    }
}
