// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use hp_core::{Pass, PeriodFilter};

use super::Session;
use crate::display::{format_active_line, period_label};
use crate::error::{Error, Result};
use crate::prompt::{Alert, BellAlert, Prompt, StdinPrompt};
use crate::station::ManualStart;

pub async fn start(state_dir: Option<PathBuf>, start: ManualStart) -> Result<()> {
    let mut session = super::open_exclusive(state_dir)?;
    let result = start_impl(&mut session, start);
    session.close().await;
    let pass = result?;
    println!(
        "Started {} for {} to {} ({})",
        pass.id,
        pass.subject_name,
        pass.destination,
        period_label(pass.period)
    );
    Ok(())
}

pub(crate) fn start_impl(session: &mut Session, start: ManualStart) -> Result<Pass> {
    session.station.start_manual(start)
}

pub async fn end(state_dir: Option<PathBuf>, id: &str) -> Result<()> {
    let mut session = super::open_exclusive(state_dir)?;
    let result = end_impl(&mut session, id, &mut StdinPrompt, &mut BellAlert).await;
    session.close().await;
    let pass = result?;
    if pass.over_limit {
        println!("Ended {} for {} (late)", pass.id, pass.subject_name);
    } else {
        println!("Ended {} for {}", pass.id, pass.subject_name);
    }
    Ok(())
}

pub(crate) async fn end_impl(
    session: &mut Session,
    id: &str,
    prompt: &mut dyn Prompt,
    alert: &mut dyn Alert,
) -> Result<Pass> {
    session
        .station
        .end_pass(id, prompt, alert)
        .await
        .ok_or_else(|| Error::PassNotFound(id.to_string()))
}

pub async fn list(state_dir: Option<PathBuf>, period: Option<PeriodFilter>) -> Result<()> {
    let session = super::open(state_dir)?;
    let lines = list_impl(&session, period);
    session.close().await;
    if lines.is_empty() {
        println!("No open passes");
    }
    for line in lines {
        println!("{}", line);
    }
    Ok(())
}

/// Open passes under `period` (or the selected filter), newest first.
pub(crate) fn list_impl(session: &Session, period: Option<PeriodFilter>) -> Vec<String> {
    let station = &session.station;
    let filter = period.unwrap_or(station.filter());
    let now = station.now();
    station
        .passes()
        .active()
        .iter()
        .filter(|p| filter.matches(p.period))
        .map(|p| format_active_line(p, now))
        .collect()
}

pub async fn live(state_dir: Option<PathBuf>) -> Result<()> {
    let session = super::open(state_dir)?;
    let lines = live_impl(&session);
    session.close().await;
    for line in lines {
        println!("{}", line);
    }
    Ok(())
}

/// Total out now, then one line per destination.
pub(crate) fn live_impl(session: &Session) -> Vec<String> {
    let passes = session.station.passes();
    let mut lines = vec![format!("Out now: {}", passes.active().len())];
    for (destination, count) in passes.out_by_destination() {
        lines.push(format!("  {destination}: {count}"));
    }
    lines
}

#[cfg(test)]
#[path = "pass_tests.rs"]
mod tests;
