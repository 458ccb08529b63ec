// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[parameterized(
    cancelled = { None, None },
    blank = { Some("   \n"), None },
    trimmed = { Some("  Ana Diaz \n"), Some("Ana Diaz") },
)]
fn normalize(raw: Option<&str>, expected: Option<&str>) {
    assert_eq!(
        normalize_answer(raw.map(String::from)).as_deref(),
        expected
    );
}
