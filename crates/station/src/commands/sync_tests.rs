// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::commands::pass::start_impl;
use crate::commands::testing::TestContext;
use crate::config::DEFAULT_TENANT;
use crate::station::ManualStart;
use crate::sync::test_helpers::MockStore;
use hp_core::{ClockSource, ManualClock, NewPass, Pass, PassRow, StudentRow};

fn remote_pass(id: &str, name: &str) -> PassRow {
    let pass = Pass::open(
        id.to_string(),
        NewPass {
            subject_name: name.to_string(),
            subject_id: None,
            destination: "Nurse".to_string(),
            period: "2".parse().ok(),
            max_minutes: 8,
        },
        ManualClock::at_default().now(),
    );
    PassRow::from_pass(&pass, DEFAULT_TENANT)
}

#[tokio::test]
async fn offline_sync_says_so() {
    let mut ctx = TestContext::new();
    assert_eq!(
        run_impl(&mut ctx.session).await,
        "No remote configured; nothing to sync"
    );
}

#[tokio::test]
async fn sync_pulls_roster_and_open_passes() {
    let store = MockStore::new();
    store.set_students(vec![StudentRow {
        student_id: "10001".into(),
        name: "Ana Diaz".into(),
        period: Some("2".into()),
        tenant_id: DEFAULT_TENANT.into(),
    }]);
    store.set_active(vec![remote_pass("p1", "Ana Diaz")]);
    let mut ctx = TestContext::with_store(store.clone());

    assert_eq!(
        run_impl(&mut ctx.session).await,
        "Synced: 1 students, 1 open passes"
    );
    assert!(ctx.reopen().station.roster().get("10001").is_some());
}

#[tokio::test]
async fn failed_fetch_keeps_local_state() {
    let store = MockStore::new();
    store.fail_fetches(true);
    let mut ctx = TestContext::with_store(store.clone());
    ctx.start("Alice");

    assert_eq!(
        run_impl(&mut ctx.session).await,
        "Synced: 0 students, 1 open passes"
    );
}

#[tokio::test]
async fn close_flushes_queued_writes() {
    let store = MockStore::new();
    let mut ctx = TestContext::with_store(store.clone());
    let pass = start_impl(
        &mut ctx.session,
        ManualStart {
            name: "Alice".into(),
            ..ManualStart::default()
        },
    )
    .unwrap();

    ctx.session.close().await;
    assert_eq!(store.writes(), vec![format!("insert_pass:{}", pass.id)]);
}
