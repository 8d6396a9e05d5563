//! Configuration management for local workspaces.
//!
//! Stores configuration in JSON format at `~/.spaceport/config.json`.

use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::domain::DEFAULT_PREVIEW_DOMAIN;
use crate::error::{Error, Result};

/// Configuration data stored in JSON format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Domain used to build browse URLs.
    #[serde(default = "default_preview_domain", rename = "previewDomain")]
    pub preview_domain: String,

    /// Address local forward listeners bind to.
    #[serde(default = "default_bind_address", rename = "bindAddress")]
    pub bind_address: IpAddr,

    /// Known workspaces.
    #[serde(default)]
    pub workspaces: Vec<WorkspaceEntry>,
}

fn default_preview_domain() -> String {
    DEFAULT_PREVIEW_DOMAIN.to_string()
}

fn default_bind_address() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            preview_domain: default_preview_domain(),
            bind_address: default_bind_address(),
            workspaces: Vec::new(),
        }
    }
}

/// A workspace served from a directory on this machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceEntry {
    /// Workspace name, also the first label of its browse URLs.
    pub name: String,

    /// Repository checkout backing the workspace.
    pub root: PathBuf,

    /// Host that forwarded connections are dialed on.
    #[serde(default = "default_host")]
    pub host: String,

    /// Privacy level per port, for ports that have been changed.
    #[serde(default)]
    pub privacy: BTreeMap<u16, String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

impl WorkspaceEntry {
    /// Create an entry with the default host and no privacy overrides.
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
            host: default_host(),
            privacy: BTreeMap::new(),
        }
    }

    /// Set the host forwarded connections are dialed on.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }
}

/// Configuration store for managing workspaces and settings.
///
/// Handles reading and writing configuration to `~/.spaceport/config.json`.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    /// Path to the configuration file.
    config_path: PathBuf,
}

impl ConfigStore {
    /// Create a new config store with the default path.
    ///
    /// Default path: `~/.spaceport/config.json`
    pub fn new() -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))?;

        let config_dir = home.join(".spaceport");
        let config_path = config_dir.join("config.json");

        Ok(Self { config_path })
    }

    /// Create a config store with a custom path (for testing).
    pub fn with_path(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// Get the configuration file path.
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load configuration from disk.
    ///
    /// Returns default config if the file doesn't exist.
    pub async fn load(&self) -> Result<Config> {
        if !self.config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&self.config_path)
            .await
            .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub async fn save(&self, config: &Config) -> Result<()> {
        if let Some(config_dir) = self.config_path.parent() {
            fs::create_dir_all(config_dir)
                .await
                .map_err(|e| Error::Config(format!("Failed to create config directory: {}", e)))?;
        }

        let content = serde_json::to_string_pretty(config)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        // Write atomically by writing to temp file then renaming
        let temp_path = self.config_path.with_extension("json.tmp");

        let mut file = fs::File::create(&temp_path)
            .await
            .map_err(|e| Error::Config(format!("Failed to create temp config file: {}", e)))?;

        file.write_all(content.as_bytes())
            .await
            .map_err(|e| Error::Config(format!("Failed to write config: {}", e)))?;

        file.sync_all()
            .await
            .map_err(|e| Error::Config(format!("Failed to sync config: {}", e)))?;

        fs::rename(&temp_path, &self.config_path)
            .await
            .map_err(|e| Error::Config(format!("Failed to rename config file: {}", e)))?;

        Ok(())
    }

    // =========================================================================
    // Workspaces
    // =========================================================================

    /// Get all configured workspaces.
    pub async fn get_workspaces(&self) -> Result<Vec<WorkspaceEntry>> {
        Ok(self.load().await?.workspaces)
    }

    /// Find a workspace by name.
    pub async fn find_workspace(&self, name: &str) -> Result<Option<WorkspaceEntry>> {
        Ok(self
            .get_workspaces()
            .await?
            .into_iter()
            .find(|w| w.name == name))
    }

    /// Add a workspace. Names must be unique.
    pub async fn add_workspace(&self, entry: WorkspaceEntry) -> Result<()> {
        let mut config = self.load().await?;

        if config.workspaces.iter().any(|w| w.name == entry.name) {
            return Err(Error::Config(format!(
                "Workspace {} already exists",
                entry.name
            )));
        }

        config.workspaces.push(entry);
        self.save(&config).await
    }

    /// Remove a workspace by name.
    pub async fn remove_workspace(&self, name: &str) -> Result<()> {
        let mut config = self.load().await?;
        let before = config.workspaces.len();
        config.workspaces.retain(|w| w.name != name);

        if config.workspaces.len() == before {
            return Err(Error::Config(format!("Workspace {} does not exist", name)));
        }
        self.save(&config).await
    }

    /// Record the privacy level of a port in a workspace.
    pub async fn set_port_privacy(&self, workspace: &str, port: u16, privacy: &str) -> Result<()> {
        let mut config = self.load().await?;

        let entry = config
            .workspaces
            .iter_mut()
            .find(|w| w.name == workspace)
            .ok_or_else(|| Error::Config(format!("Workspace {} does not exist", workspace)))?;
        entry.privacy.insert(port, privacy.to_string());

        self.save(&config).await
    }

    // =========================================================================
    // Settings
    // =========================================================================

    /// Set the domain used in browse URLs.
    pub async fn set_preview_domain(&self, domain: &str) -> Result<()> {
        let mut config = self.load().await?;
        config.preview_domain = domain.to_string();
        self.save(&config).await
    }

    /// Set the address local forward listeners bind to.
    pub async fn set_bind_address(&self, address: IpAddr) -> Result<()> {
        let mut config = self.load().await?;
        config.bind_address = address;
        self.save(&config).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn test_store() -> (ConfigStore, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        (ConfigStore::with_path(path), dir)
    }

    #[tokio::test]
    async fn test_load_nonexistent() {
        let (store, _dir) = test_store().await;
        let config = store.load().await.unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.preview_domain, "githubpreview.dev");
        assert_eq!(config.bind_address, IpAddr::V4(Ipv4Addr::LOCALHOST));
    }

    #[tokio::test]
    async fn test_partial_config_uses_defaults() {
        let (store, _dir) = test_store().await;
        fs::write(
            store.config_path(),
            r#"{"workspaces": [{"name": "app", "root": "/src/app"}]}"#,
        )
        .await
        .unwrap();

        let config = store.load().await.unwrap();
        assert_eq!(config.preview_domain, "githubpreview.dev");
        assert_eq!(config.workspaces[0].host, "127.0.0.1");
        assert!(config.workspaces[0].privacy.is_empty());
    }

    #[tokio::test]
    async fn test_workspaces() {
        let (store, _dir) = test_store().await;

        store
            .add_workspace(WorkspaceEntry::new("app", "/src/app"))
            .await
            .unwrap();
        store
            .add_workspace(WorkspaceEntry::new("api", "/src/api").with_host("10.0.0.2"))
            .await
            .unwrap();

        let workspaces = store.get_workspaces().await.unwrap();
        assert_eq!(workspaces.len(), 2);

        let api = store.find_workspace("api").await.unwrap().unwrap();
        assert_eq!(api.host, "10.0.0.2");

        store.remove_workspace("app").await.unwrap();
        assert!(store.find_workspace("app").await.unwrap().is_none());
        assert!(store.remove_workspace("app").await.is_err());
    }

    #[tokio::test]
    async fn test_duplicate_workspace() {
        let (store, _dir) = test_store().await;

        store
            .add_workspace(WorkspaceEntry::new("app", "/src/app"))
            .await
            .unwrap();
        let result = store.add_workspace(WorkspaceEntry::new("app", "/tmp")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_port_privacy_round_trips_through_disk() {
        let (store, _dir) = test_store().await;
        store
            .add_workspace(WorkspaceEntry::new("app", "/src/app"))
            .await
            .unwrap();

        store.set_port_privacy("app", 8080, "public").await.unwrap();
        store.set_port_privacy("app", 8080, "org").await.unwrap();

        let app = store.find_workspace("app").await.unwrap().unwrap();
        assert_eq!(app.privacy.get(&8080).map(String::as_str), Some("org"));
        assert!(store.set_port_privacy("nope", 1, "public").await.is_err());
    }

    #[tokio::test]
    async fn test_settings() {
        let (store, _dir) = test_store().await;
        store.set_preview_domain("preview.example").await.unwrap();
        store
            .set_bind_address(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
            .await
            .unwrap();

        let config = store.load().await.unwrap();
        assert_eq!(config.preview_domain, "preview.example");
        assert_eq!(config.bind_address, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    }
}
