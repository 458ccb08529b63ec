// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use super::Session;
use crate::error::Result;

pub async fn run(state_dir: Option<PathBuf>) -> Result<()> {
    let mut session = super::open_exclusive(state_dir)?;
    let message = run_impl(&mut session).await;
    session.close().await;
    println!("{}", message);
    Ok(())
}

/// One bootstrap pull. Remote failures are logged, never returned.
pub(crate) async fn run_impl(session: &mut Session) -> String {
    if !session.is_online() {
        return "No remote configured; nothing to sync".to_string();
    }
    session.bootstrap().await;
    let station = &session.station;
    format!(
        "Synced: {} students, {} open passes",
        station.roster().entries().len(),
        station.passes().active().len()
    )
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
