// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::config;
use crate::error::{Error, Result};
use crate::logging;
use crate::terminal;

const LOCK_FILE_NAME: &str = "station.lock";

pub fn run(state_dir: Option<PathBuf>) -> Result<()> {
    if !std::io::stdin().is_terminal() || !std::io::stdout().is_terminal() {
        return Err(Error::TtyRequired);
    }
    let state_dir = config::state_dir(state_dir)?;
    fs::create_dir_all(&state_dir)?;
    let _lock = acquire_lock(&state_dir)?;
    logging::init_station(&state_dir);
    tracing::info!(state_dir = %state_dir.display(), "station starting");

    let rt = super::runtime()?;
    rt.block_on(async {
        let session = super::open(Some(state_dir))?;
        terminal::run(session).await
    })
}

/// Holds `<state_dir>/station.lock` exclusively until the file is dropped.
pub(crate) fn acquire_lock(state_dir: &Path) -> Result<fs::File> {
    let lock_path = state_dir.join(LOCK_FILE_NAME);
    let file = fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&lock_path)?;
    file.try_lock_exclusive()
        .map_err(|_| Error::StationBusy(state_dir.display().to_string()))?;
    Ok(file)
}

#[cfg(test)]
#[path = "station_tests.rs"]
mod tests;
