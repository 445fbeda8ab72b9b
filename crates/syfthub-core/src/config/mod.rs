//! Configuration for SyftHub SDK tools
//!
// Allow nested config module - this is intentional for the config subsystem

#![allow(clippy::module_inception)]
//!
//! Settings are read from a TOML file with three sections:
//!
//! - `[runtime]` - where the local SyftBox keeps its data and whose datasite is ours
//! - `[account]` - whether account setup has completed
//! - `[bridge]` - worker thread name and optional timeout for blocking calls
//!
//! Environment variables are expanded in the file before parsing.

pub mod config;
pub mod error;

// Re-export main types for convenience
pub use config::{AccountConfig, BridgeConfig, Config, RuntimeConfig};
pub use error::{ConfigError, Result};
