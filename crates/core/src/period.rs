// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Class periods and the period filter.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A class period, 1 through 6.
///
/// Serialized as its decimal string form ("1".."6") to match the grouping
/// key used on passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period(u8);

impl Period {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 6;

    /// Creates a period, rejecting values outside 1..=6.
    pub fn new(value: u8) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Period(value))
        } else {
            Err(Error::InvalidPeriod(value.to_string()))
        }
    }

    /// Creates a period from a database or wire integer, where anything
    /// outside 1..=6 (including 0 for "unset") means unscoped.
    pub fn from_number(value: i64) -> Option<Self> {
        u8::try_from(value).ok().and_then(|v| Period::new(v).ok())
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// All periods in order.
    pub fn all() -> impl Iterator<Item = Period> {
        (Self::MIN..=Self::MAX).map(Period)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        trimmed
            .parse::<u8>()
            .map_err(|_| Error::InvalidPeriod(trimmed.to_string()))
            .and_then(Period::new)
    }
}

impl TryFrom<String> for Period {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Period> for String {
    fn from(value: Period) -> Self {
        value.to_string()
    }
}

/// The period view selection: one period, or all of them.
///
/// When a single period is selected it doubles as the fallback period for
/// scanned subjects whose roster entry carries none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PeriodFilter {
    All,
    One(Period),
}

impl PeriodFilter {
    /// Returns the selected period when exactly one is selected.
    pub fn single(self) -> Option<Period> {
        match self {
            PeriodFilter::All => None,
            PeriodFilter::One(p) => Some(p),
        }
    }

    /// Returns true if a pass or entry with the given period is visible.
    pub fn matches(self, period: Option<Period>) -> bool {
        match self {
            PeriodFilter::All => true,
            PeriodFilter::One(p) => period == Some(p),
        }
    }

    /// Cycles 1 → 2 → … → 6 → All → 1.
    pub fn next(self) -> Self {
        match self {
            PeriodFilter::One(p) if p.get() < Period::MAX => PeriodFilter::One(Period(p.get() + 1)),
            PeriodFilter::One(_) => PeriodFilter::All,
            PeriodFilter::All => PeriodFilter::One(Period(Period::MIN)),
        }
    }
}

impl Default for PeriodFilter {
    fn default() -> Self {
        PeriodFilter::One(Period(1))
    }
}

impl fmt::Display for PeriodFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodFilter::All => write!(f, "All"),
            PeriodFilter::One(p) => write!(f, "{p}"),
        }
    }
}

impl FromStr for PeriodFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(PeriodFilter::All);
        }
        trimmed
            .parse::<Period>()
            .map(PeriodFilter::One)
            .map_err(|_| Error::InvalidPeriodFilter(trimmed.to_string()))
    }
}

impl TryFrom<String> for PeriodFilter {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<PeriodFilter> for String {
    fn from(value: PeriodFilter) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
#[path = "period_tests.rs"]
mod tests;
