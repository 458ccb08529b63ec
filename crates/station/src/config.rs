// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Station configuration management.
//!
//! Configuration is stored in `<state_dir>/config.toml` and includes:
//! - `tenant`: the scoping key for every remote row and notification
//! - `remote`: optional remote store connection; absent means offline-only
//! - `defaults`: the destination and time limit a fresh station starts with

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::env;
use crate::error::{Error, Result};

const STATE_DIR_NAME: &str = "hallpass";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Tenant used when none is configured.
pub const DEFAULT_TENANT: &str = "DEFAULT_SCHOOL";

/// Station configuration stored in `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_tenant")]
    pub tenant: String,
    /// Remote store connection (optional - if absent, runs in local-only mode).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<RemoteConfig>,
    #[serde(default)]
    pub defaults: StationDefaults,
}

/// Remote store connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// WebSocket URL of the remote store (`ws://` or `wss://`).
    pub url: String,
    /// Max time to wait for a reply to one request, in milliseconds (default: 5000).
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Initial delay for the subscription reconnect backoff (default: 250).
    #[serde(default = "default_reconnect_initial_delay_ms")]
    pub reconnect_initial_delay_ms: u64,
    /// Maximum delay between reconnection attempts in seconds (default: 30).
    #[serde(default = "default_reconnect_max_delay_secs")]
    pub reconnect_max_delay_secs: u64,
}

/// Destination and time limit for a station that has never been configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationDefaults {
    #[serde(default = "default_destination")]
    pub destination: String,
    #[serde(default = "default_max_minutes")]
    pub max_minutes: u32,
}

impl Default for StationDefaults {
    fn default() -> Self {
        StationDefaults {
            destination: default_destination(),
            max_minutes: default_max_minutes(),
        }
    }
}

fn default_tenant() -> String {
    DEFAULT_TENANT.to_string()
}

fn default_destination() -> String {
    "Bathroom".to_string()
}

fn default_max_minutes() -> u32 {
    8
}

fn default_request_timeout_ms() -> u64 {
    5_000
}

fn default_reconnect_initial_delay_ms() -> u64 {
    250
}

fn default_reconnect_max_delay_secs() -> u64 {
    30
}

impl RemoteConfig {
    /// Creates a remote config with default timings.
    pub fn new(url: impl Into<String>) -> Self {
        RemoteConfig {
            url: url.into(),
            request_timeout_ms: default_request_timeout_ms(),
            reconnect_initial_delay_ms: default_reconnect_initial_delay_ms(),
            reconnect_max_delay_secs: default_reconnect_max_delay_secs(),
        }
    }

    /// Validates that the URL is a WebSocket URL.
    ///
    /// Returns an error message if the URL is invalid.
    pub fn validate_url(&self) -> Option<String> {
        if self.url.starts_with("ws://") || self.url.starts_with("wss://") {
            return None;
        }
        Some(format!(
            "invalid remote URL '{}': must be ws:// or wss://",
            self.url
        ))
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tenant: default_tenant(),
            remote: None,
            defaults: StationDefaults::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the given state directory.
    ///
    /// A missing file yields the default config; an unreadable or invalid one
    /// is an error.
    pub fn load(state_dir: &Path) -> Result<Self> {
        let config_path = state_dir.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(&config_path)
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Loads the config and applies `HALLPASS_REMOTE_URL` / `HALLPASS_TENANT`.
    pub fn load_with_env(state_dir: &Path) -> Result<Self> {
        let mut config = Config::load(state_dir)?;
        config.apply_overrides(env::remote_url(), env::tenant());
        config.validate()?;
        Ok(config)
    }

    /// Overrides the remote URL and tenant, keeping any other remote settings.
    pub fn apply_overrides(&mut self, remote_url: Option<String>, tenant: Option<String>) {
        if let Some(url) = remote_url {
            match self.remote.as_mut() {
                Some(remote) => remote.url = url,
                None => self.remote = Some(RemoteConfig::new(url)),
            }
        }
        if let Some(tenant) = tenant {
            self.tenant = tenant;
        }
    }

    /// Checks the remote URL and tenant.
    pub fn validate(&self) -> Result<()> {
        if self.tenant.trim().is_empty() {
            return Err(Error::Config("tenant cannot be empty".to_string()));
        }
        if let Some(msg) = self.remote.as_ref().and_then(RemoteConfig::validate_url) {
            return Err(Error::Config(msg));
        }
        Ok(())
    }

    /// Returns true if remote sync is configured.
    pub fn is_remote_mode(&self) -> bool {
        self.remote.is_some()
    }

    /// Returns the remote URL if configured.
    pub fn remote_url(&self) -> Option<&str> {
        self.remote.as_ref().map(|r| r.url.as_str())
    }

    /// Saves configuration to the given state directory.
    pub fn save(&self, state_dir: &Path) -> Result<()> {
        fs::create_dir_all(state_dir)?;
        let config_path = state_dir.join(CONFIG_FILE_NAME);
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(&config_path, content)?;
        Ok(())
    }
}

/// Path of the config file inside a state directory.
pub fn config_path(state_dir: &Path) -> PathBuf {
    state_dir.join(CONFIG_FILE_NAME)
}

/// Resolves the station state directory.
///
/// Precedence: explicit flag, `HALLPASS_STATE_DIR`, `$XDG_STATE_HOME/hallpass`,
/// then the platform state (or local data) directory.
pub fn state_dir(flag: Option<PathBuf>) -> Result<PathBuf> {
    resolve_state_dir(
        flag,
        env::state_dir(),
        env::xdg_state_home(),
        dirs::state_dir().or_else(dirs::data_local_dir),
    )
}

fn resolve_state_dir(
    flag: Option<PathBuf>,
    env_dir: Option<PathBuf>,
    xdg_state_home: Option<PathBuf>,
    platform: Option<PathBuf>,
) -> Result<PathBuf> {
    if let Some(dir) = flag.or(env_dir) {
        return Ok(dir);
    }
    xdg_state_home
        .or(platform)
        .map(|base| base.join(STATE_DIR_NAME))
        .ok_or_else(|| {
            Error::Config("cannot determine state directory; set HALLPASS_STATE_DIR".to_string())
        })
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
