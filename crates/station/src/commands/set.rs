// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use hp_core::PeriodFilter;

use super::Session;
use crate::cli::SettingKey;
use crate::error::{Error, Result};

pub async fn run(state_dir: Option<PathBuf>, key: SettingKey, value: &str) -> Result<()> {
    let mut session = super::open_exclusive(state_dir)?;
    let result = run_impl(&mut session, key, value);
    session.close().await;
    println!("{}", result?);
    Ok(())
}

/// Applies one setting. Returns a line describing the stored value.
pub(crate) fn run_impl(session: &mut Session, key: SettingKey, value: &str) -> Result<String> {
    let station = &mut session.station;
    match key {
        SettingKey::ScanMode => {
            let on = parse_switch(value)?;
            station.set_scan_mode(on);
            Ok(format!("scan-mode = {}", if on { "on" } else { "off" }))
        }
        SettingKey::Destination => {
            station.set_destination(value)?;
            Ok(format!("destination = {}", station.settings().destination))
        }
        SettingKey::MaxMinutes => {
            let minutes: u32 = value.trim().parse().map_err(|_| {
                Error::Config(format!("invalid max-minutes '{value}': expected whole minutes"))
            })?;
            let stored = station.set_max_minutes(minutes);
            Ok(format!("max-minutes = {stored}"))
        }
        SettingKey::Period => {
            let filter: PeriodFilter = value.trim().parse()?;
            station.set_filter(filter);
            Ok(format!("period = {filter}"))
        }
    }
}

fn parse_switch(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        _ => Err(Error::Config(format!(
            "invalid scan-mode '{value}': expected on or off"
        ))),
    }
}

#[cfg(test)]
#[path = "set_tests.rs"]
mod tests;
