//! Command implementations

pub mod config;
pub mod datasites;
pub mod status;

use syfthub_core::{Config, DatasiteClient, ServiceContext};

use crate::error::Result;

/// The service instance every command runs against
pub type Service = ServiceContext<DatasiteClient>;

/// Build the service from the `[runtime]` and `[account]` sections
pub fn build_service(config: &Config) -> Result<Service> {
    let client = DatasiteClient::from_config(&config.runtime)?;
    Ok(ServiceContext::new(client).with_account_configured(config.account.configured))
}
