//! Unified error handling for syfthub-core
//!
//! Guards and the call bridge raise [`CoreError`]. Wrapped operations keep
//! their own error type `E` and only need `E: From<CoreError>`, so their own
//! failures pass through untouched.
//!
//! # Example
//!
//! ```rust
//! use syfthub_core::CoreError;
//!
//! fn handle_error(err: CoreError) {
//!     if err.is_runtime_not_running() {
//!         println!("Start SyftBox first");
//!     } else if err.is_unauthorized() {
//!         println!("Run account setup first");
//!     }
//! }
//!
//! let err = CoreError::RuntimeNotRunning {
//!     message: "Local SyftBox is not running.".to_string(),
//! };
//! assert!(err.is_runtime_not_running());
//! ```

use std::time::Duration;
use thiserror::Error;

use crate::config::ConfigError;

/// Message carried by [`CoreError::RuntimeNotRunning`] when a guard refuses a call
pub const RUNTIME_NOT_RUNNING_MESSAGE: &str =
    "Local SyftBox is not running. Cannot send RPC request.";

/// Remediation hint carried by [`CoreError::Authentication`]
pub const ACCOUNT_SETUP_HINT: &str = "Account setup required before using services. \
     Please run: client.setup_accounting(email, password)";

/// Core error type for guards, the call bridge and the concrete collaborators
#[derive(Error, Debug)]
pub enum CoreError {
    /// The local runtime's readiness check failed
    #[error("{message}")]
    RuntimeNotRunning { message: String },

    /// Account setup has not been completed
    #[error("Authentication error: {message}")]
    Authentication { message: String },

    /// The bridge could not start its worker thread
    #[error("Failed to spawn bridge worker thread: {0}")]
    WorkerSpawn(#[source] std::io::Error),

    /// The bridge could not build the worker's runtime
    #[error("Failed to build bridge runtime: {0}")]
    RuntimeBuild(#[source] std::io::Error),

    /// A blocking call exceeded its configured timeout
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),

    /// Reading the datasite tree failed
    #[error("Failed to read datasites from {path}: {source}")]
    Datasite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Returns true if the local runtime was reported as not running
    #[must_use]
    pub fn is_runtime_not_running(&self) -> bool {
        matches!(self, CoreError::RuntimeNotRunning { .. })
    }

    /// Returns true if account setup is missing
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, CoreError::Authentication { .. })
    }

    /// Returns true if this is a timeout error
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, CoreError::Timeout(_))
    }

    /// Returns true if the bridge itself failed, as opposed to a guard or the operation
    #[must_use]
    pub fn is_bridge_failure(&self) -> bool {
        matches!(
            self,
            CoreError::WorkerSpawn(_) | CoreError::RuntimeBuild(_) | CoreError::Timeout(_)
        )
    }

    pub(crate) fn runtime_not_running() -> Self {
        CoreError::RuntimeNotRunning {
            message: RUNTIME_NOT_RUNNING_MESSAGE.to_string(),
        }
    }

    pub(crate) fn account_not_configured() -> Self {
        CoreError::Authentication {
            message: ACCOUNT_SETUP_HINT.to_string(),
        }
    }
}
