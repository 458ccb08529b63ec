// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use chrono::{DateTime, Utc};
use hp_core::{Pass, Period};

use crate::admin::AdminState;
use crate::report::{mm_ss, Flyer, Summary};

/// Width of the name column in pass listings.
const NAME_WIDTH: usize = 20;
const DESTINATION_WIDTH: usize = 12;

pub fn period_label(period: Option<Period>) -> String {
    match period {
        Some(p) => format!("P{p}"),
        None => "-".to_string(),
    }
}

pub fn limit_label(max_minutes: u32) -> String {
    if max_minutes == 0 {
        "no limit".to_string()
    } else {
        format!("{max_minutes}m")
    }
}

/// One open pass: id, name, destination, period, elapsed against limit.
///
/// A pass past its limit is flagged `LATE`; that flag is display-only.
pub fn format_active_line(pass: &Pass, now: DateTime<Utc>) -> String {
    let elapsed = mm_ss(pass.elapsed(now).num_milliseconds());
    let late = if pass.running_late(now) { "  LATE" } else { "" };
    format!(
        "{}  {:<name$} {:<dest$} {:<3} {:>6} / {}{}",
        pass.id,
        pass.subject_name,
        pass.destination,
        period_label(pass.period),
        elapsed,
        limit_label(pass.max_minutes),
        late,
        name = NAME_WIDTH,
        dest = DESTINATION_WIDTH,
    )
}

pub fn format_history_line(pass: &Pass) -> String {
    let duration = pass
        .end_time
        .map(|end| mm_ss((end - pass.start_time).num_milliseconds()))
        .unwrap_or_default();
    let mut line = format!(
        "{}  {:<name$} {:<dest$} {:<3} {:>6}",
        pass.id,
        pass.subject_name,
        pass.destination,
        period_label(pass.period),
        duration,
        name = NAME_WIDTH,
        dest = DESTINATION_WIDTH,
    );
    if pass.over_limit {
        line.push_str("  LATE");
        if !pass.late_reason.is_empty() {
            line.push_str(": ");
            line.push_str(&pass.late_reason);
        }
    }
    line
}

pub fn format_flyer_line(flyer: &Flyer) -> String {
    format!(
        "{:<name$} {:>3} passes  avg {}  total {}  late {} ({}%)",
        flyer.name,
        flyer.count,
        mm_ss(flyer.avg_ms()),
        mm_ss(flyer.total_ms),
        flyer.late,
        flyer.late_pct(),
        name = NAME_WIDTH,
    )
}

pub fn format_summary(label: &str, summary: &Summary) -> String {
    format!(
        "{label}: {} passes, avg {} min, busiest {}, {} late",
        summary.count, summary.avg_minutes, summary.busiest, summary.late
    )
}

/// Admin status with the unlock countdown.
pub fn admin_label(state: AdminState, now: DateTime<Utc>) -> String {
    match state {
        AdminState::Unlocked { expiry } => {
            let secs = (expiry - now).num_seconds().max(0);
            format!("unlocked ({secs}s)")
        }
        other => other.label().to_string(),
    }
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
