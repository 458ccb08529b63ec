// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::commands::testing::TestContext;
use crate::test_helpers::{CountingAlert, ScriptedPrompt};
use chrono::Duration;
use hp_core::Period;

fn manual(name: &str, period: Option<u8>) -> ManualStart {
    ManualStart {
        name: name.to_string(),
        period: period.map(|p| Period::new(p).unwrap()),
        ..ManualStart::default()
    }
}

#[tokio::test]
async fn start_uses_station_defaults() {
    let mut ctx = TestContext::new();
    let pass = start_impl(&mut ctx.session, manual("Alice", None)).unwrap();

    assert_eq!(pass.destination, "Bathroom");
    assert_eq!(pass.max_minutes, 8);
    assert_eq!(pass.period, Some(Period::new(1).unwrap()));
}

#[tokio::test]
async fn start_persists_for_the_next_command() {
    let mut ctx = TestContext::new();
    let pass = start_impl(&mut ctx.session, manual("Alice", Some(3))).unwrap();

    let next = ctx.reopen();
    assert_eq!(next.station.passes().get_active(&pass.id), Some(&pass));
}

#[tokio::test]
async fn end_unknown_is_not_found() {
    let mut ctx = TestContext::new();
    let err = end_impl(
        &mut ctx.session,
        "missing",
        &mut ScriptedPrompt::silent(),
        &mut CountingAlert::default(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::PassNotFound(id) if id == "missing"));
}

#[tokio::test]
async fn end_late_records_reason() {
    let mut ctx = TestContext::new();
    let pass = ctx.start("Alice");
    ctx.clock.advance(Duration::minutes(9));

    let mut prompt = ScriptedPrompt::new([Some("nurse kept them")]);
    let mut alert = CountingAlert::default();
    let ended = end_impl(&mut ctx.session, &pass.id, &mut prompt, &mut alert)
        .await
        .unwrap();

    assert!(ended.over_limit);
    assert_eq!(ended.late_reason, "nurse kept them");
    assert_eq!(alert.chimes, 1);
    assert!(ctx.reopen().station.passes().active().is_empty());
}

#[tokio::test]
async fn list_honors_period_override() {
    let mut ctx = TestContext::new();
    start_impl(&mut ctx.session, manual("Alice", Some(1))).unwrap();
    start_impl(&mut ctx.session, manual("Ben", Some(2))).unwrap();

    let selected = list_impl(&ctx.session, None);
    assert_eq!(selected.len(), 1);
    assert!(selected[0].contains("Alice"));

    let all = list_impl(&ctx.session, Some(PeriodFilter::All));
    assert_eq!(all.len(), 2);
    assert!(all[0].contains("Ben"));
}

#[tokio::test]
async fn live_counts_per_destination() {
    let mut ctx = TestContext::new();
    ctx.start("Alice");
    ctx.start("Ben");
    start_impl(
        &mut ctx.session,
        ManualStart {
            name: "Cleo".into(),
            destination: Some("Nurse".into()),
            ..ManualStart::default()
        },
    )
    .unwrap();

    assert_eq!(
        live_impl(&ctx.session),
        vec!["Out now: 3", "  Bathroom: 2", "  Nurse: 1"]
    );
}
