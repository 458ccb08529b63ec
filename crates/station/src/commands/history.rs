// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::fs;
use std::path::{Path, PathBuf};

use hp_core::PeriodFilter;

use super::Session;
use crate::display::{format_flyer_line, format_history_line, format_summary};
use crate::error::Result;
use crate::report;

pub async fn history(state_dir: Option<PathBuf>, period: Option<PeriodFilter>) -> Result<()> {
    let session = super::open(state_dir)?;
    let lines = history_impl(&session, period);
    session.close().await;
    if lines.is_empty() {
        println!("No history");
    }
    for line in lines {
        println!("{}", line);
    }
    Ok(())
}

pub(crate) fn history_impl(session: &Session, period: Option<PeriodFilter>) -> Vec<String> {
    let station = &session.station;
    let filter = period.unwrap_or(station.filter());
    report::filtered_history(station.passes().history(), filter)
        .into_iter()
        .map(format_history_line)
        .collect()
}

pub async fn export(
    state_dir: Option<PathBuf>,
    file: Option<PathBuf>,
    period: Option<PeriodFilter>,
) -> Result<()> {
    let session = super::open(state_dir)?;
    let result = export_impl(&session, file, period);
    session.close().await;
    let path = result?;
    println!("Exported history to {}", path.display());
    Ok(())
}

/// Writes the history CSV; the default file name follows the filter.
pub(crate) fn export_impl(
    session: &Session,
    file: Option<PathBuf>,
    period: Option<PeriodFilter>,
) -> Result<PathBuf> {
    let station = &session.station;
    let filter = period.unwrap_or(station.filter());
    let path = file.unwrap_or_else(|| PathBuf::from(report::history_file_name(filter)));
    let csv = report::history_csv(station.passes().history(), filter)?;
    write_file(&path, &csv)?;
    tracing::info!(path = %path.display(), "history exported");
    Ok(path)
}

pub async fn flyers(
    state_dir: Option<PathBuf>,
    period: Option<PeriodFilter>,
    csv: Option<PathBuf>,
) -> Result<()> {
    let session = super::open(state_dir)?;
    let result = flyers_impl(&session, period, csv.as_deref());
    session.close().await;
    let lines = result?;
    if lines.is_empty() {
        println!("No history");
    }
    for line in lines {
        println!("{}", line);
    }
    if let Some(path) = csv {
        println!("Wrote {}", path.display());
    }
    Ok(())
}

pub(crate) fn flyers_impl(
    session: &Session,
    period: Option<PeriodFilter>,
    csv: Option<&Path>,
) -> Result<Vec<String>> {
    let station = &session.station;
    let filter = period.unwrap_or(station.filter());
    let ranked = report::flyers(station.passes().history(), filter);
    if let Some(path) = csv {
        write_file(path, &report::flyers_csv(&ranked)?)?;
    }
    Ok(ranked.iter().map(format_flyer_line).collect())
}

pub async fn summary(state_dir: Option<PathBuf>) -> Result<()> {
    let session = super::open(state_dir)?;
    let lines = summary_impl(&session);
    session.close().await;
    for line in lines {
        println!("{}", line);
    }
    Ok(())
}

pub(crate) fn summary_impl(session: &Session) -> Vec<String> {
    let station = &session.station;
    let history = station.passes().history();
    let now = station.now();
    vec![
        format_summary("Today", &report::daily_summary(history, now)),
        format_summary("This week", &report::weekly_summary(history, now)),
    ]
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod tests;
