// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use chrono::Duration;
use hp_core::{ClockSource, ManualClock, NewPass};
use yare::parameterized;

fn pass(max_minutes: u32) -> Pass {
    Pass::open(
        "a1b2c3d4e5f6".to_string(),
        NewPass {
            subject_name: "Alice".to_string(),
            subject_id: None,
            destination: "Nurse".to_string(),
            period: Some(Period::new(2).unwrap()),
            max_minutes,
        },
        ManualClock::at_default().now(),
    )
}

#[parameterized(
    scoped = { Some(3), "P3" },
    unscoped = { None, "-" },
)]
fn period_labels(period: Option<u8>, expected: &str) {
    let period = period.map(|p| Period::new(p).unwrap());
    assert_eq!(period_label(period), expected);
}

#[test]
fn active_line_flags_running_late() {
    let p = pass(8);
    let start = p.start_time;

    let on_time = format_active_line(&p, start + Duration::minutes(3));
    assert!(on_time.starts_with("a1b2c3d4e5f6  Alice"));
    assert!(on_time.contains("03:00 / 8m"));
    assert!(!on_time.ends_with("LATE"));

    let late = format_active_line(&p, start + Duration::minutes(9));
    assert!(late.ends_with("LATE"));
}

#[test]
fn active_line_without_limit_is_never_late() {
    let p = pass(0);
    let line = format_active_line(&p, p.start_time + Duration::hours(3));
    assert!(line.contains("/ no limit"));
    assert!(!line.contains("LATE"));
}

#[test]
fn history_line_shows_late_reason() {
    let mut p = pass(8);
    let end = p.start_time + Duration::minutes(10);
    p.close(end, true, "long line".into());
    let line = format_history_line(&p);
    assert!(line.contains("10:00"));
    assert!(line.ends_with("LATE: long line"));
}

#[test]
fn admin_label_counts_down() {
    let now = ManualClock::at_default().now();
    let state = AdminState::Unlocked {
        expiry: now + Duration::seconds(42),
    };
    assert_eq!(admin_label(state, now), "unlocked (42s)");
    assert_eq!(admin_label(AdminState::Locked, now), "locked");
}

#[test]
fn summary_line() {
    let summary = Summary {
        count: 3,
        avg_minutes: 5.5,
        busiest: "Nurse".into(),
        late: 1,
    };
    assert_eq!(
        format_summary("Today", &summary),
        "Today: 3 passes, avg 5.5 min, busiest Nurse, 1 late"
    );
}
