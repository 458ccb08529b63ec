// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing setup.
//!
//! The interactive station owns the terminal, so its log goes to
//! `<state_dir>/station.log`. One-shot commands log warnings to stderr.
//! `RUST_LOG` overrides the default level in both cases.

use std::fs;
use std::path::{Path, PathBuf};

use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "station.log";

pub fn log_path(state_dir: &Path) -> PathBuf {
    state_dir.join(LOG_FILE_NAME)
}

/// File logging for the interactive station, falling back to stderr.
pub fn init_station(state_dir: &Path) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = fs::create_dir_all(state_dir);
    if let Ok(file) = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path(state_dir))
    {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(file)
            .with_ansi(false)
            .try_init();
    } else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }
}

/// Stderr logging for one-shot commands.
pub fn init_cli() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .try_init();
}
