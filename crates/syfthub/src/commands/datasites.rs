//! `syfthub datasites`
//!
//! Lists datasites through a guarded async operation, driven to completion
//! from this synchronous CLI by the call bridge.

use futures::FutureExt;
use syfthub_core::{
    AsyncOperation, BlockingOperation, BridgeOptions, Config, ensure_runtime_running,
    make_blocking, require_authorization,
};
use tracing::info;

use crate::cli::OutputFormat;
use crate::commands::{Service, build_service};
use crate::error::{Result, SyftHubError};

/// The `list_datasites` operation with both guards, adapted for sync callers
pub fn list_datasites(
    options: BridgeOptions,
) -> BlockingOperation<Service, (), Vec<String>, SyftHubError> {
    let op = AsyncOperation::new(
        "list_datasites_async",
        "Lists the datasites synced to this machine.",
        |service: &Service, ()| {
            async move {
                service
                    .client()
                    .datasites()
                    .await
                    .map_err(SyftHubError::from)
            }
            .boxed()
        },
    );

    make_blocking(require_authorization(ensure_runtime_running(op))).with_options(options)
}

pub fn handle_datasites(config: &Config, output: OutputFormat) -> Result<()> {
    let service = build_service(config)?;
    let op = list_datasites(BridgeOptions::from(&config.bridge));

    info!(operation = op.name(), "Calling");
    let names = op.call(&service, ())?;

    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&names)?),
        OutputFormat::Text => {
            if names.is_empty() {
                println!("No datasites found");
            }
            for name in &names {
                println!("{}", name);
            }
        }
    }

    Ok(())
}
