// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Roster entries and their remote row form.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::period::Period;

/// A known subject: display name plus home period, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub name: String,
    #[serde(default)]
    pub period: Option<Period>,
}

/// The roster, keyed by subject id.
pub type Roster = BTreeMap<String, RosterEntry>;

/// A roster entry as stored by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRow {
    pub student_id: String,
    pub name: String,
    #[serde(default)]
    pub period: Option<String>,
    pub tenant_id: String,
}

impl StudentRow {
    pub fn from_entry(student_id: &str, entry: &RosterEntry, tenant_id: &str) -> Self {
        StudentRow {
            student_id: student_id.to_string(),
            name: entry.name.clone(),
            period: entry.period.map(|p| p.to_string()),
            tenant_id: tenant_id.to_string(),
        }
    }

    /// Splits the row into its roster key and entry.
    pub fn into_entry(self) -> (String, RosterEntry) {
        let entry = RosterEntry {
            name: self.name,
            period: self.period.and_then(|p| p.parse().ok()),
        };
        (self.student_id, entry)
    }
}

/// Builds a roster from remote rows; later rows win on duplicate ids.
pub fn roster_from_rows(rows: Vec<StudentRow>) -> Roster {
    rows.into_iter().map(StudentRow::into_entry).collect()
}

#[cfg(test)]
#[path = "roster_tests.rs"]
mod tests;
