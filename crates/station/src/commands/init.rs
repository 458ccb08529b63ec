// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::{Path, PathBuf};

use crate::config::{self, Config, RemoteConfig};
use crate::error::{Error, Result};

pub fn run(state_dir: Option<PathBuf>, tenant: Option<String>, remote: Option<String>) -> Result<()> {
    let state_dir = config::state_dir(state_dir)?;
    let config = run_impl(&state_dir, tenant, remote)?;

    println!("Initialized station at {}", state_dir.display());
    println!("Tenant: {}", config.tenant);
    match config.remote_url() {
        Some(url) => println!("Remote: {}", url),
        None => println!("Remote: none (offline only)"),
    }
    Ok(())
}

pub(crate) fn run_impl(
    state_dir: &Path,
    tenant: Option<String>,
    remote: Option<String>,
) -> Result<Config> {
    let path = config::config_path(state_dir);
    if path.exists() {
        return Err(Error::AlreadyInitialized(path.display().to_string()));
    }

    let mut config = Config::default();
    if let Some(tenant) = tenant {
        config.tenant = tenant.trim().to_string();
    }
    config.remote = remote.map(RemoteConfig::new);
    config.validate()?;
    config.save(state_dir)?;
    tracing::info!(tenant = %config.tenant, remote = config.is_remote_mode(), "config written");
    Ok(config)
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
