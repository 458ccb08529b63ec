// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Digit-run extraction from scanned codes.
//!
//! Badge scanners emit codes with vendor prefixes and check characters
//! (`BADGE-00123-X`). Both the admin badge and subject ids are recovered by
//! taking the first run of consecutive digits of a minimum length.

use regex::Regex;
use std::sync::LazyLock;

// Hard-coded patterns, exercised by the tests below.
static ADMIN_DIGITS_RE: LazyLock<Regex> = LazyLock::new(|| match Regex::new(r"\d{4,}") {
    Ok(re) => re,
    Err(_) => unreachable!("static regex pattern"),
});
static SUBJECT_DIGITS_RE: LazyLock<Regex> = LazyLock::new(|| match Regex::new(r"\d{5,}") {
    Ok(re) => re,
    Err(_) => unreachable!("static regex pattern"),
});

/// Returns the first run of four or more digits, the admin badge identity.
pub fn admin_badge_digits(code: &str) -> Option<&str> {
    ADMIN_DIGITS_RE.find(code).map(|m| m.as_str())
}

/// Returns the subject id for a scanned code.
///
/// This is the first run of five or more digits, or the whole trimmed code
/// when the code has no such run.
pub fn subject_id_from_code(code: &str) -> String {
    match SUBJECT_DIGITS_RE.find(code) {
        Some(m) => m.as_str().to_string(),
        None => code.trim().to_string(),
    }
}

#[cfg(test)]
#[path = "badge_tests.rs"]
mod tests;
