// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;

#[test]
fn errors_map_to_error_tone_without_hint() {
    let notice = Notice::from_error(&Error::BadgeUnreadable);
    assert_eq!(notice.tone, Tone::Error);
    assert_eq!(notice.message, "could not read digits from badge");
}

#[test]
fn nothing_pending_is_info() {
    let notice = Notice::from_error(&Error::NothingPending);
    assert_eq!(notice.tone, Tone::Info);
}

#[test]
fn constructors_set_tone() {
    assert_eq!(Notice::success("ok").tone, Tone::Success);
    assert_eq!(Notice::info("fyi").tone, Tone::Info);
    assert_eq!(Notice::error("no").message, "no");
}
