// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Project configuration management.
//!
//! Configuration is stored in `.outbox/config.toml` and includes:
//! - `remote`: base URL the queued endpoints are sent to
//! - `queue`: which store backs the queue
//! - `sync`: scheduler interval and retry ceiling
//! - `network`: connectivity probe settings

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use outbox_core::{JsonlStore, QueueStore, SqliteStore};

use crate::error::{Error, Result};

const WORK_DIR_NAME: &str = ".outbox";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Project configuration stored in `.outbox/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub remote: RemoteConfig,
    #[serde(default)]
    pub queue: QueueConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub network: NetworkConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL endpoints are joined onto (`http://` or `https://`).
    pub url: String,
    /// Per-request timeout in seconds (default: 30).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Environment variable holding a bearer token, if the remote needs one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_env: Option<String>,
}

fn default_timeout_secs() -> u64 {
    30
}

/// Storage backend for the queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Sqlite,
    Jsonl,
}

impl Backend {
    fn file_name(self) -> &'static str {
        match self {
            Backend::Sqlite => "queue.db",
            Backend::Jsonl => "queue.jsonl",
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Backend::Sqlite => "sqlite",
            Backend::Jsonl => "jsonl",
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueueConfig {
    #[serde(default)]
    pub backend: Backend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Seconds between periodic cycles (default: 300).
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Failed attempts tolerated before an entry is dropped (default: 3).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_interval_secs() -> u64 {
    300
}

fn default_max_retries() -> u32 {
    crate::sync::DEFAULT_MAX_RETRIES
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            interval_secs: default_interval_secs(),
            max_retries: default_max_retries(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Seconds between connectivity probes in `outbox run` (default: 15).
    #[serde(default = "default_probe_interval_secs")]
    pub probe_interval_secs: u64,
    /// Resolve/connect timeout for one probe in milliseconds (default: 2000).
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
}

fn default_probe_interval_secs() -> u64 {
    15
}

fn default_probe_timeout_ms() -> u64 {
    2000
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            probe_interval_secs: default_probe_interval_secs(),
            probe_timeout_ms: default_probe_timeout_ms(),
        }
    }
}

impl Config {
    /// Creates a config for `url` with default settings.
    pub fn new(url: &str, backend: Backend) -> Result<Self> {
        let config = Config {
            remote: RemoteConfig {
                url: url.to_string(),
                timeout_secs: default_timeout_secs(),
                token_env: None,
            },
            queue: QueueConfig { backend },
            sync: SyncConfig::default(),
            network: NetworkConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check values that would otherwise fail later at runtime.
    pub fn validate(&self) -> Result<()> {
        let url = reqwest::Url::parse(&self.remote.url)
            .map_err(|e| Error::Config(format!("invalid remote url '{}': {}", self.remote.url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "remote url must be http or https, got '{}'",
                self.remote.url
            )));
        }
        if url.host_str().is_none() {
            return Err(Error::Config(format!("remote url '{}' has no host", self.remote.url)));
        }
        if self.sync.interval_secs == 0 {
            return Err(Error::Config("sync.interval_secs must be at least 1".to_string()));
        }
        if self.network.probe_interval_secs == 0 {
            return Err(Error::Config(
                "network.probe_interval_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Loads and validates configuration from the given `.outbox/` directory.
    pub fn load(work_dir: &Path) -> Result<Self> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = fs::read_to_string(&config_path)
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to the given `.outbox/` directory.
    pub fn save(&self, work_dir: &Path) -> Result<()> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.remote.timeout_secs)
    }

    pub fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync.interval_secs)
    }

    pub fn probe_interval(&self) -> Duration {
        Duration::from_secs(self.network.probe_interval_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.network.probe_timeout_ms)
    }

    /// Bearer token from the configured environment variable, if set and
    /// non-empty.
    pub fn token(&self) -> Option<String> {
        let var = self.remote.token_env.as_deref()?;
        std::env::var(var).ok().filter(|t| !t.is_empty())
    }
}

/// Find the .outbox directory by walking up from the current directory
pub fn find_work_dir() -> Result<PathBuf> {
    find_work_dir_from(&std::env::current_dir()?)
}

/// Find the .outbox directory by walking up from `start`
pub fn find_work_dir_from(start: &Path) -> Result<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let work_dir = current.join(WORK_DIR_NAME);
        if work_dir.is_dir() {
            return Ok(work_dir);
        }
        if !current.pop() {
            return Err(Error::NotInitialized);
        }
    }
}

/// Path of the queue file inside `work_dir`
pub fn queue_path(work_dir: &Path, config: &Config) -> PathBuf {
    work_dir.join(config.queue.backend.file_name())
}

/// Open the configured queue store
pub fn open_store(work_dir: &Path, config: &Config) -> Result<Box<dyn QueueStore>> {
    let path = queue_path(work_dir, config);
    let store: Box<dyn QueueStore> = match config.queue.backend {
        Backend::Sqlite => Box::new(SqliteStore::open(&path)?),
        Backend::Jsonl => Box::new(JsonlStore::open(&path)?),
    };
    Ok(store)
}

/// Initialize a new .outbox directory at the given path
pub fn init_work_dir(path: &Path, config: &Config) -> Result<PathBuf> {
    let work_dir = path.join(WORK_DIR_NAME);

    if work_dir.exists() {
        return Err(Error::AlreadyInitialized(work_dir.display().to_string()));
    }

    fs::create_dir_all(&work_dir)?;
    config.save(&work_dir)?;
    open_store(&work_dir, config)?;

    Ok(work_dir)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
