// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;

#[test]
fn test_vars_constants() {
    assert_eq!(vars::HALLPASS_STATE_DIR, "HALLPASS_STATE_DIR");
    assert_eq!(vars::XDG_STATE_HOME, "XDG_STATE_HOME");
    assert_eq!(vars::HALLPASS_REMOTE_URL, "HALLPASS_REMOTE_URL");
    assert_eq!(vars::HALLPASS_TENANT, "HALLPASS_TENANT");
}

#[test]
fn test_tenant_unset() {
    std::env::remove_var("HALLPASS_TENANT");
    assert_eq!(tenant(), None);
}

#[test]
fn test_tenant_set() {
    std::env::set_var("HALLPASS_TENANT", "LINCOLN_HS");
    assert_eq!(tenant().as_deref(), Some("LINCOLN_HS"));
    std::env::remove_var("HALLPASS_TENANT");
}

#[test]
fn test_remote_url_blank_is_unset() {
    std::env::set_var("HALLPASS_REMOTE_URL", "  ");
    assert_eq!(remote_url(), None);
    std::env::remove_var("HALLPASS_REMOTE_URL");
}

#[test]
fn test_xdg_state_home_set() {
    std::env::set_var("XDG_STATE_HOME", "/tmp/xdg-state");
    assert_eq!(xdg_state_home(), Some(PathBuf::from("/tmp/xdg-state")));
    std::env::remove_var("XDG_STATE_HOME");
}
