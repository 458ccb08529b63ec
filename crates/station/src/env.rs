// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! All runtime environment variables read by the station are defined here
//! with typed accessor functions. The variable name constants are generated
//! by `build.rs` and live in the [`vars`] submodule.

use std::path::PathBuf;

/// Generated environment variable name constants.
pub mod vars {
    include!(concat!(env!("OUT_DIR"), "/env_vars.rs"));
}

/// Returns the value of `HALLPASS_STATE_DIR` if set.
pub fn state_dir() -> Option<PathBuf> {
    non_empty(vars::HALLPASS_STATE_DIR).map(PathBuf::from)
}

/// Returns the value of `XDG_STATE_HOME` if set.
pub fn xdg_state_home() -> Option<PathBuf> {
    non_empty(vars::XDG_STATE_HOME).map(PathBuf::from)
}

/// Returns the value of `HALLPASS_REMOTE_URL` if set.
pub fn remote_url() -> Option<String> {
    non_empty(vars::HALLPASS_REMOTE_URL)
}

/// Returns the value of `HALLPASS_TENANT` if set.
pub fn tenant() -> Option<String> {
    non_empty(vars::HALLPASS_TENANT)
}

fn non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
