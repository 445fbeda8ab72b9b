//! Error types for syfthub
//!
//! Maps library errors onto user-facing failures with remediation tips.

use colored::Colorize;
use syfthub_core::{ConfigError, CoreError};
use thiserror::Error;

/// Cargo-style diagnostic formatter for CLI errors.
///
/// Produces structured output like:
/// ```text
/// error: Local SyftBox is not running. Cannot send RPC request.
///
///   tip: start the SyftBox client and wait for the first sync
/// ```
pub struct CliDiagnostic {
    message: String,
    tips: Vec<String>,
}

impl CliDiagnostic {
    pub fn error(message: &str) -> Self {
        Self {
            message: message.to_string(),
            tips: Vec::new(),
        }
    }

    pub fn tip(mut self, description: &str) -> Self {
        self.tips.push(description.to_string());
        self
    }

    /// Print the diagnostic to stderr with colored formatting.
    pub fn print(&self) {
        eprint!("{}{}", "error".red().bold(), ": ".bold());
        eprintln!("{}", self.message);

        for tip in &self.tips {
            eprintln!();
            eprint!("  {}{}", "tip".yellow().bold(), ": ".bold());
            eprintln!("{}", tip);
        }
    }
}

/// Main error type for the syfthub application
#[derive(Error, Debug)]
pub enum SyftHubError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{message}")]
    RuntimeNotRunning { message: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Datasite error: {message}")]
    Datasite { message: String },

    #[error("Bridge error: {message}")]
    Bridge { message: String },

    #[error("Output formatting error: {message}")]
    OutputError { message: String },
}

/// Result type for syfthub operations
pub type Result<T> = std::result::Result<T, SyftHubError>;

impl SyftHubError {
    /// Get helpful suggestions for resolving this error
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            SyftHubError::RuntimeNotRunning { .. } => vec![
                "Start the SyftBox client and wait for the first sync".to_string(),
                "Check which datasite is expected: syfthub status".to_string(),
                "Point [runtime] data_dir at your SyftBox folder: syfthub config path".to_string(),
            ],
            SyftHubError::AuthenticationFailed { .. } => vec![
                "Complete account setup, then set `configured = true` under [account]"
                    .to_string(),
            ],
            SyftHubError::Config(ConfigError::MissingField { field }) => vec![
                format!("Add '{}' to your config file: syfthub config path", field),
            ],
            SyftHubError::Config(ConfigError::ParseError(_)) => vec![
                "Check the config file syntax: syfthub config path".to_string(),
            ],
            SyftHubError::Bridge { message } if message.contains("timed out") => vec![
                "Raise or remove [bridge] timeout_secs in your config file".to_string(),
            ],
            _ => vec![],
        }
    }

    /// Print a cargo-style diagnostic to stderr using colored formatting.
    pub fn print_diagnostic(&self) {
        let mut diag = CliDiagnostic::error(&self.to_string());

        for suggestion in self.suggestions() {
            diag = diag.tip(&suggestion);
        }

        diag.print();
    }
}

impl From<CoreError> for SyftHubError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::RuntimeNotRunning { message } => SyftHubError::RuntimeNotRunning { message },
            CoreError::Authentication { message } => {
                SyftHubError::AuthenticationFailed { message }
            }
            CoreError::Config(e) => SyftHubError::Config(e),
            CoreError::Datasite { .. } => SyftHubError::Datasite {
                message: err.to_string(),
            },
            other => SyftHubError::Bridge {
                message: other.to_string(),
            },
        }
    }
}

impl From<serde_json::Error> for SyftHubError {
    fn from(err: serde_json::Error) -> Self {
        SyftHubError::OutputError {
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for SyftHubError {
    fn from(err: toml::ser::Error) -> Self {
        SyftHubError::OutputError {
            message: err.to_string(),
        }
    }
}
