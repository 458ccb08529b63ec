// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

//! Test infrastructure for command testing against a temp state directory.
//!
//! Must be created inside a tokio runtime (`#[tokio::test]`), since the
//! session starts its remote writer task.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::commands::testing::TestContext;
//!
//! #[tokio::test]
//! async fn test_some_command() {
//!     let mut ctx = TestContext::new();
//!     ctx.start("Alice");
//!     // Run command logic against ctx.session
//! }
//! ```

use std::sync::Arc;

use hp_core::{ManualClock, Pass};
use tempfile::TempDir;

use super::Session;
use crate::config::Config;
use crate::sync::RemoteStore;
use crate::station::ManualStart;

/// A session over a temp state directory and a manual clock.
pub struct TestContext {
    pub session: Session,
    pub clock: Arc<ManualClock>,
    pub temp: TempDir,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let clock = Arc::new(ManualClock::at_default());
        let session = Session::open_with(temp.path().to_path_buf(), config, clock.clone())
            .expect("Failed to open session");
        TestContext {
            session,
            clock,
            temp,
        }
    }

    /// A session mirrored to `store`.
    pub fn with_store(store: Arc<dyn RemoteStore>) -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let clock = Arc::new(ManualClock::at_default());
        let session = Session::open_with_store(
            temp.path().to_path_buf(),
            Config::default(),
            clock.clone(),
            Some(store),
        )
        .expect("Failed to open session");
        TestContext {
            session,
            clock,
            temp,
        }
    }

    /// Starts a pass with the station defaults.
    pub fn start(&mut self, name: &str) -> Pass {
        self.session
            .station
            .start_manual(ManualStart {
                name: name.to_string(),
                ..ManualStart::default()
            })
            .unwrap()
    }

    /// Reopens the same state directory, as the next command would.
    pub fn reopen(&self) -> Session {
        Session::open_with(
            self.temp.path().to_path_buf(),
            self.session.config.clone(),
            self.clock.clone(),
        )
        .unwrap()
    }
}

#[tokio::test]
async fn offline_session_applies_nothing() {
    let mut ctx = TestContext::new();
    assert!(!ctx.session.is_online());
    ctx.session.bootstrap().await;
    assert_eq!(ctx.session.apply_events(), 0);
}

#[tokio::test]
async fn state_survives_between_sessions() {
    let mut ctx = TestContext::new();
    let pass = ctx.start("Alice");

    let reopened = ctx.reopen();
    assert_eq!(reopened.station.passes().active(), &[pass]);
    reopened.close().await;
}

#[tokio::test]
async fn close_returns_promptly_when_offline() {
    let mut ctx = TestContext::new();
    ctx.start("Alice");
    tokio::time::timeout(std::time::Duration::from_secs(1), ctx.session.close())
        .await
        .unwrap();
}
