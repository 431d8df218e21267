//! Application configuration management.
//!
//! This module handles loading and saving the configuration: which backend
//! to authenticate against, where the session is persisted, and the last
//! email used to sign in.
//!
//! Configuration is stored at `~/.config/civicdesk/config.json`. Environment
//! variables override the file (see `Config::apply_env`) for the current
//! process only; they are never written back.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::client::DEFAULT_REQUEST_TIMEOUT_SECS;
use crate::api::mock::DEFAULT_MOCK_DELAY_MS;
use crate::api::{AuthService, HttpAuthService, MockAuthService};
use crate::storage::{FileStorage, KeyringStorage, MemoryStorage, Storage};

/// Application name used for config/data directory paths
const APP_NAME: &str = "civicdesk";

/// Config file name
const CONFIG_FILE: &str = "config.json";

const ENV_API_URL: &str = "CIVICDESK_API_URL";
const ENV_STORAGE: &str = "CIVICDESK_STORAGE";
const ENV_SCOPE: &str = "CIVICDESK_SCOPE";

/// Where the session snapshot is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Keyring,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "file" => Ok(StorageBackend::File),
            "keyring" => Ok(StorageBackend::Keyring),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(anyhow::anyhow!("Unknown storage backend '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend base URL. Without one, the built-in mock backend is used.
    pub api_base_url: Option<String>,
    pub storage: StorageBackend,
    /// Separates sessions of different deployments on one machine.
    pub scope: Option<String>,
    pub mock_delay_ms: u64,
    pub request_timeout_secs: u64,
    /// Directory for rolling log files. Stderr only when unset.
    pub log_dir: Option<PathBuf>,
    pub last_email: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: None,
            storage: StorageBackend::default(),
            scope: None,
            mock_delay_ms: DEFAULT_MOCK_DELAY_MS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            log_dir: None,
            last_email: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            Ok(serde_json::from_str(&contents).context("Failed to parse config file")?)
        } else {
            Ok(Self::default())
        }
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    /// Record the email of the last successful sign-in.
    ///
    /// Re-reads the file so settings overridden from the environment for
    /// this run are not persisted.
    pub fn remember_last_email(email: &str) -> Result<()> {
        Self::update_last_email(&Self::config_path()?, email)
    }

    fn update_last_email(path: &Path, email: &str) -> Result<()> {
        let mut stored = Self::load_from(path)?;
        stored.last_email = Some(email.to_string());
        stored.save_to(path)
    }

    /// Override file settings from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = var(ENV_API_URL).filter(|v| !v.is_empty()) {
            self.api_base_url = Some(url);
        }
        if let Some(storage) = var(ENV_STORAGE).filter(|v| !v.is_empty()) {
            self.storage = storage
                .parse()
                .with_context(|| format!("Invalid {}", ENV_STORAGE))?;
        }
        if let Some(scope) = var(ENV_SCOPE).filter(|v| !v.is_empty()) {
            self.scope = Some(scope);
        }
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory holding the persisted session for this scope.
    pub fn data_dir(&self) -> Result<PathBuf> {
        let data_dir = dirs::data_local_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;

        let mut path = data_dir.join(APP_NAME);
        if let Some(ref scope) = self.scope {
            path = path.join(scope);
        }
        Ok(path)
    }

    /// The auth backend this configuration points at.
    pub fn auth_service(&self) -> Result<Arc<dyn AuthService>> {
        match self.api_base_url {
            Some(ref url) => {
                debug!(url = %url, "Using HTTP auth backend");
                let service = HttpAuthService::with_timeout(
                    url.clone(),
                    Duration::from_secs(self.request_timeout_secs),
                )
                .context("Failed to create HTTP auth client")?;
                Ok(Arc::new(service))
            }
            None => {
                debug!(delay_ms = self.mock_delay_ms, "Using mock auth backend");
                Ok(Arc::new(MockAuthService::with_delay(Duration::from_millis(
                    self.mock_delay_ms,
                ))))
            }
        }
    }

    /// The storage backend this configuration points at.
    pub fn storage(&self) -> Result<Arc<dyn Storage>> {
        let storage: Arc<dyn Storage> = match self.storage {
            StorageBackend::File => Arc::new(FileStorage::new(self.data_dir()?)?),
            StorageBackend::Keyring => Arc::new(KeyringStorage::new(self.scope.as_deref())),
            StorageBackend::Memory => Arc::new(MemoryStorage::new()),
        };
        Ok(storage)
    }
}
