//! Concrete collaborators: the local datasite client and a service context
//!
//! A SyftBox runtime keeps each user's datasite under
//! `<data_dir>/datasites/<email>`. The runtime counts as running when the
//! current user's datasite exists on disk.

use std::path::{Path, PathBuf};

use crate::config::{ConfigError, RuntimeConfig};
use crate::error::{CoreError, Result};
use crate::guards::{AccountAware, RuntimeAware, RuntimeClient};

/// Client for the local SyftBox runtime, backed by its datasite directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasiteClient {
    data_dir: PathBuf,
    email: String,
}

impl DatasiteClient {
    pub fn new(data_dir: impl Into<PathBuf>, email: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            email: email.into(),
        }
    }

    /// Build a client from the `[runtime]` config section
    ///
    /// Fails when no email is configured, since the user's datasite cannot
    /// be located without it.
    pub fn from_config(config: &RuntimeConfig) -> Result<Self> {
        let email = config
            .email
            .clone()
            .ok_or_else(|| ConfigError::MissingField {
                field: "runtime.email".to_string(),
            })?;
        Ok(Self::new(config.data_dir()?, email))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn datasites_dir(&self) -> PathBuf {
        self.data_dir.join("datasites")
    }

    /// The current user's datasite
    pub fn my_datasite(&self) -> PathBuf {
        self.datasites_dir().join(&self.email)
    }

    /// Names of all datasites synced to this machine, sorted
    pub async fn datasites(&self) -> Result<Vec<String>> {
        let dir = self.datasites_dir();
        let read_err = |source| CoreError::Datasite {
            path: dir.display().to_string(),
            source,
        };

        let mut entries = tokio::fs::read_dir(&dir).await.map_err(read_err)?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(read_err)? {
            if entry.file_type().await.map_err(read_err)?.is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();

        Ok(names)
    }
}

impl RuntimeClient for DatasiteClient {
    fn is_running(&self) -> bool {
        self.my_datasite().is_dir()
    }
}

/// A service instance: a runtime client plus the account setup flag
///
/// The client is required at construction. Guards only ever read from the
/// context.
#[derive(Debug, Clone)]
pub struct ServiceContext<C> {
    client: C,
    account_configured: bool,
}

impl<C: RuntimeClient> ServiceContext<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            account_configured: false,
        }
    }

    pub fn with_account_configured(mut self, configured: bool) -> Self {
        self.account_configured = configured;
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }
}

impl<C: RuntimeClient> RuntimeAware for ServiceContext<C> {
    type Client = C;

    fn runtime_client(&self) -> &C {
        &self.client
    }
}

impl<C> AccountAware for ServiceContext<C> {
    fn account_configured(&self) -> bool {
        self.account_configured
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_datasite_layout() {
        let client = DatasiteClient::new("/data/SyftBox", "alice@example.org");
        assert_eq!(
            client.my_datasite(),
            PathBuf::from("/data/SyftBox/datasites/alice@example.org")
        );
        assert_eq!(client.email(), "alice@example.org");
    }

    #[test]
    fn test_running_follows_datasite_dir() {
        let dir = TempDir::new().unwrap();
        let client = DatasiteClient::new(dir.path(), "alice@example.org");
        assert!(!client.is_running());

        std::fs::create_dir_all(client.my_datasite()).unwrap();
        assert!(client.is_running());
    }

    #[test]
    fn test_from_config_requires_email() {
        let config = RuntimeConfig {
            data_dir: Some("/data/SyftBox".to_string()),
            email: None,
        };
        let err = DatasiteClient::from_config(&config).unwrap_err();
        assert!(err.to_string().contains("runtime.email"));
    }

    #[tokio::test]
    async fn test_datasites_lists_directories_only() {
        let dir = TempDir::new().unwrap();
        let client = DatasiteClient::new(dir.path(), "alice@example.org");
        let root = client.datasites_dir();
        std::fs::create_dir_all(root.join("bob@example.org")).unwrap();
        std::fs::create_dir_all(root.join("alice@example.org")).unwrap();
        std::fs::write(root.join("README.md"), "not a datasite").unwrap();

        let names = client.datasites().await.unwrap();
        assert_eq!(names, vec!["alice@example.org", "bob@example.org"]);
    }

    #[tokio::test]
    async fn test_datasites_missing_dir() {
        let dir = TempDir::new().unwrap();
        let client = DatasiteClient::new(dir.path().join("nope"), "alice@example.org");
        let err = client.datasites().await.unwrap_err();
        assert!(matches!(err, CoreError::Datasite { .. }));
    }

    #[test]
    fn test_service_context_flags() {
        let ctx = ServiceContext::new(DatasiteClient::new("/data", "a@b.c"));
        assert!(!ctx.account_configured());
        let ctx = ctx.with_account_configured(true);
        assert!(ctx.account_configured());
        assert_eq!(ctx.runtime_client().email(), "a@b.c");
    }
}
