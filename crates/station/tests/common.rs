// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// `hallpass` pointed at `state`, with remote overrides cleared.
pub fn hp(state: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("hallpass");
    cmd.env("HALLPASS_STATE_DIR", state.path())
        .env_remove("HALLPASS_REMOTE_URL")
        .env_remove("HALLPASS_TENANT")
        .env_remove("RUST_LOG");
    cmd
}

/// Starts a pass and returns its id.
pub fn start_pass(state: &TempDir, args: &[&str]) -> String {
    let output = hp(state).arg("start").args(args).output().unwrap();
    assert!(output.status.success(), "start failed: {:?}", output);
    String::from_utf8_lossy(&output.stdout)
        .split_whitespace()
        .nth(1)
        .unwrap()
        .to_string()
}

pub const ROSTER_CSV: &str = "\u{feff}StudentId,First Name,Last Name,Period\n\
    10001,Ana,Diaz,1\n\
    10002,Ben,Ortiz,2\n\
    10003,,Nobody,3\n";
