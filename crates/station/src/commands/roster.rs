// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::{Path, PathBuf};

use hp_core::PeriodFilter;

use super::Session;
use crate::display::period_label;
use crate::error::Result;
use crate::roster::ImportReport;

pub async fn import(state_dir: Option<PathBuf>, file: &Path) -> Result<()> {
    let mut session = super::open_exclusive(state_dir)?;
    let result = import_impl(&mut session, file);
    session.close().await;
    let report = result?;
    println!(
        "Imported/updated {} students with periods ({} skipped)",
        report.imported, report.skipped
    );
    Ok(())
}

pub(crate) fn import_impl(session: &mut Session, file: &Path) -> Result<ImportReport> {
    session.station.import_roster(file)
}

pub async fn list(state_dir: Option<PathBuf>, period: Option<PeriodFilter>) -> Result<()> {
    let session = super::open(state_dir)?;
    let lines = list_impl(&session, period);
    session.close().await;
    if lines.is_empty() {
        println!("No students");
    }
    for line in lines {
        println!("{}", line);
    }
    Ok(())
}

/// Roster entries under `period` (or the selected filter), ordered by id.
pub(crate) fn list_impl(session: &Session, period: Option<PeriodFilter>) -> Vec<String> {
    let station = &session.station;
    let filter = period.unwrap_or(station.filter());
    station
        .roster()
        .in_period(filter)
        .into_iter()
        .map(|(id, entry)| format!("{:<10} {:<3} {}", id, period_label(entry.period), entry.name))
        .collect()
}

#[cfg(test)]
#[path = "roster_tests.rs"]
mod tests;
