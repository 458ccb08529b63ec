// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The pass record and its remote row form.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::period::Period;

/// The fields a caller supplies to open a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPass {
    pub subject_name: String,
    pub subject_id: Option<String>,
    pub destination: String,
    pub period: Option<Period>,
    /// Time limit in minutes; 0 disables over-limit detection.
    pub max_minutes: u32,
}

/// A single egress record, open while `end_time` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pass {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<String>,
    pub subject_name: String,
    pub destination: String,
    #[serde(default)]
    pub period: Option<Period>,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub max_minutes: u32,
    #[serde(default)]
    pub over_limit: bool,
    #[serde(default)]
    pub late_reason: String,
}

impl Pass {
    /// Creates an open pass started at `start_time`.
    pub fn open(id: String, new: NewPass, start_time: DateTime<Utc>) -> Self {
        Pass {
            id,
            subject_id: new.subject_id,
            subject_name: new.subject_name,
            destination: new.destination,
            period: new.period,
            start_time,
            end_time: None,
            max_minutes: new.max_minutes,
            over_limit: false,
            late_reason: String::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    /// Time out of the room: up to `end_time` when closed, else up to `now`.
    pub fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        let end = self.end_time.unwrap_or(now);
        end - self.start_time
    }

    /// Returns true if a pass lasting until `at` exceeds its time limit.
    ///
    /// Strictly greater: a pass ended exactly at its limit is on time.
    pub fn exceeds_limit(&self, at: DateTime<Utc>) -> bool {
        if self.max_minutes == 0 {
            return false;
        }
        let elapsed_ms = (at - self.start_time).num_milliseconds();
        elapsed_ms > i64::from(self.max_minutes) * 60_000
    }

    /// Presentation-only late flag for a still-open pass.
    pub fn running_late(&self, now: DateTime<Utc>) -> bool {
        self.is_open() && self.exceeds_limit(now)
    }

    /// Closes the pass. `over_limit` and `late_reason` are set here and
    /// nowhere else.
    pub fn close(&mut self, end_time: DateTime<Utc>, over_limit: bool, late_reason: String) {
        self.end_time = Some(end_time);
        self.over_limit = over_limit;
        self.late_reason = if over_limit { late_reason } else { String::new() };
    }

    /// Case-insensitive subject name comparison used by the scan toggle.
    pub fn is_for(&self, name: &str) -> bool {
        self.subject_name.to_lowercase() == name.trim().to_lowercase()
    }
}

/// A pass as stored by the remote store, scoped to a tenant.
///
/// The period travels as free text: rows written by other clients may carry
/// values this station does not recognize, which are read back as unscoped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassRow {
    pub id: String,
    #[serde(default)]
    pub student_id: Option<String>,
    pub student_name: String,
    pub destination: String,
    #[serde(default)]
    pub period: Option<String>,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub max_minutes: u32,
    #[serde(default)]
    pub over_limit: bool,
    #[serde(default)]
    pub late_reason: String,
    pub tenant_id: String,
}

impl PassRow {
    pub fn from_pass(pass: &Pass, tenant_id: &str) -> Self {
        PassRow {
            id: pass.id.clone(),
            student_id: pass.subject_id.clone(),
            student_name: pass.subject_name.clone(),
            destination: pass.destination.clone(),
            period: pass.period.map(|p| p.to_string()),
            start_time: pass.start_time,
            end_time: pass.end_time,
            max_minutes: pass.max_minutes,
            over_limit: pass.over_limit,
            late_reason: pass.late_reason.clone(),
            tenant_id: tenant_id.to_string(),
        }
    }

    pub fn into_pass(self) -> Pass {
        Pass {
            id: self.id,
            subject_id: self.student_id,
            subject_name: self.student_name,
            destination: self.destination,
            period: self.period.and_then(|p| p.parse().ok()),
            start_time: self.start_time,
            end_time: self.end_time,
            max_minutes: self.max_minutes,
            over_limit: self.over_limit,
            late_reason: self.late_reason,
        }
    }
}

/// Generate a pass ID from the subject name and start instant.
/// Format: first 12 hex chars of SHA256(name + start)
pub fn generate_pass_id(subject_name: &str, start_time: &DateTime<Utc>) -> String {
    let input = format!(
        "{}{}",
        subject_name,
        start_time.to_rfc3339_opts(SecondsFormat::Nanos, true)
    );
    let hash = Sha256::digest(input.as_bytes());
    hex::encode(&hash[..6])
}

/// Generate a unique pass ID, appending `-2`, `-3`, ... on collision.
pub fn generate_unique_pass_id<F>(subject_name: &str, start_time: &DateTime<Utc>, exists: F) -> String
where
    F: Fn(&str) -> bool,
{
    let base_id = generate_pass_id(subject_name, start_time);
    if !exists(&base_id) {
        return base_id;
    }

    let mut suffix = 2;
    loop {
        let id = format!("{base_id}-{suffix}");
        if !exists(&id) {
            return id;
        }
        suffix += 1;
    }
}

#[cfg(test)]
#[path = "pass_tests.rs"]
mod tests;
