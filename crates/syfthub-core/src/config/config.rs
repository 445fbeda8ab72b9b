//! Configuration management for SyftHub SDK tools
//!
//! Handles configuration loading from files and environment variables.
//! Configuration is stored in TOML format.

#[cfg(target_os = "macos")]
use directories::BaseDirs;
use directories::{ProjectDirs, UserDirs};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::error::{ConfigError, Result};
use crate::bridge::DEFAULT_THREAD_NAME;

/// Main configuration structure
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Location of the local SyftBox runtime
    #[serde(default)]
    pub runtime: RuntimeConfig,
    /// Account setup state
    #[serde(default)]
    pub account: AccountConfig,
    /// Settings for blocking calls through the bridge
    #[serde(default)]
    pub bridge: BridgeConfig,
}

/// Where the local SyftBox runtime keeps its data
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct RuntimeConfig {
    /// SyftBox data directory; `~` is expanded. Defaults to `~/SyftBox`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,
    /// Email identifying the current user's datasite
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Account setup state
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct AccountConfig {
    /// Whether account setup has completed
    #[serde(default)]
    pub configured: bool,
}

/// Bridge worker configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BridgeConfig {
    /// Name given to per-call worker threads
    #[serde(default = "default_thread_name")]
    pub thread_name: String,
    /// Timeout in seconds for blocking calls; unset means wait forever
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            thread_name: default_thread_name(),
            timeout_secs: None,
        }
    }
}

fn default_thread_name() -> String {
    DEFAULT_THREAD_NAME.to_string()
}

impl RuntimeConfig {
    /// Resolve the data directory, expanding `~` and falling back to `~/SyftBox`
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(PathBuf::from(shellexpand::tilde(dir).into_owned())),
            None => {
                let user_dirs = UserDirs::new().ok_or(ConfigError::HomeDirError)?;
                Ok(user_dirs.home_dir().join("SyftBox"))
            }
        }
    }
}

impl Config {
    /// Load configuration from the standard location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    ///
    /// A missing file yields the default configuration.
    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| ConfigError::LoadError {
            path: config_path.display().to_string(),
            source: e,
        })?;

        // Expand environment variables in the config content
        let expanded_content = Self::expand_env_vars(&content);

        let config: Config = toml::from_str(&expanded_content)?;

        Ok(config)
    }

    /// Save configuration to the standard location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to_path(&config_path)
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        // Create parent directories if they don't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::SaveError {
                path: parent.display().to_string(),
                source: e,
            })?;
        }

        let content = toml::to_string_pretty(self)?;

        fs::write(config_path, content).map_err(|e| ConfigError::SaveError {
            path: config_path.display().to_string(),
            source: e,
        })?;

        Ok(())
    }

    /// Get the path to the configuration file
    ///
    /// On macOS, this supports both the standard macOS path and Linux-style ~/.config path:
    /// 1. Check ~/.config/syfthub/config.toml (Linux-style, preferred for consistency)
    /// 2. Fall back to ~/Library/Application Support/org.openmined.syfthub/config.toml
    ///
    /// On Linux: ~/.config/syfthub/config.toml
    /// On Windows: %APPDATA%\openmined\syfthub\config.toml
    pub fn config_path() -> Result<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            if let Some(base_dirs) = BaseDirs::new() {
                let linux_style_path = base_dirs
                    .home_dir()
                    .join(".config")
                    .join("syfthub")
                    .join("config.toml");

                if linux_style_path
                    .parent()
                    .map(|p| p.exists())
                    .unwrap_or(false)
                {
                    return Ok(linux_style_path);
                }
            }
        }

        let proj_dirs =
            ProjectDirs::from("org", "openmined", "syfthub").ok_or(ConfigError::ConfigDirError)?;

        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    /// Expand environment variables in configuration content
    ///
    /// Supports ${VAR} and ${VAR:-default} syntax. Unset variables without a
    /// default are left as-is.
    ///
    /// Example:
    /// ```toml
    /// [runtime]
    /// email = "${SYFTBOX_EMAIL}"
    /// data_dir = "${SYFTBOX_DATA_DIR:-~/SyftBox}"
    /// ```
    fn expand_env_vars(content: &str) -> String {
        let expanded =
            shellexpand::env_with_context_no_errors(content, |var| std::env::var(var).ok());
        expanded.to_string()
    }
}
