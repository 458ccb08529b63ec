// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Scan resolution against the roster, plus bulk CSV import.
//!
//! Unknown codes are onboarded on the spot by asking for a name (and a
//! period when no single period is selected). Every new or imported entry
//! is queued as a remote upsert.

use std::io::Read;

use hp_core::{subject_id_from_code, Period, PeriodFilter, Roster, RosterEntry};

use crate::error::{Error, Result};
use crate::prompt::Prompt;
use crate::sync::{Outbox, RemoteWrite};

const ID_HEADERS: &[&str] = &["studentid", "id"];
const FIRST_HEADERS: &[&str] = &["firstname", "first name", "first"];
const LAST_HEADERS: &[&str] = &["lastname", "last name", "last"];
const PERIOD_HEADERS: &[&str] = &["period", "class period"];

/// The identity a scan code resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub subject_id: String,
    pub name: String,
    /// The roster period, or the selected single period as a fallback.
    pub period: Period,
}

/// Outcome of a roster import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
}

pub struct RosterResolver {
    entries: Roster,
    outbox: Outbox,
}

impl RosterResolver {
    pub fn new(entries: Roster, outbox: Outbox) -> Self {
        RosterResolver { entries, outbox }
    }

    pub fn entries(&self) -> &Roster {
        &self.entries
    }

    pub fn get(&self, subject_id: &str) -> Option<&RosterEntry> {
        self.entries.get(subject_id)
    }

    /// Entries visible under `filter`, as `(subject_id, entry)` pairs.
    pub fn in_period(&self, filter: PeriodFilter) -> Vec<(&str, &RosterEntry)> {
        self.entries
            .iter()
            .filter(|(_, entry)| filter.matches(entry.period))
            .map(|(id, entry)| (id.as_str(), entry))
            .collect()
    }

    /// Resolves a decoded scan code to an identity.
    ///
    /// Returns `Ok(None)` when onboarding was cancelled; nothing changes in
    /// that case.
    pub async fn resolve(
        &mut self,
        code: &str,
        filter: PeriodFilter,
        prompt: &mut dyn Prompt,
    ) -> Result<Option<Resolved>> {
        let subject_id = subject_id_from_code(code);

        let entry = match self.entries.get(&subject_id) {
            Some(entry) => entry.clone(),
            None => match self.onboard(&subject_id, filter, prompt).await? {
                Some(entry) => entry,
                None => return Ok(None),
            },
        };

        let period = entry
            .period
            .or_else(|| filter.single())
            .ok_or(Error::NoPeriodAvailable)?;

        tracing::debug!(subject_id = %subject_id, period = %period, "scan resolved");
        Ok(Some(Resolved {
            subject_id,
            name: entry.name.trim().to_string(),
            period,
        }))
    }

    async fn onboard(
        &mut self,
        subject_id: &str,
        filter: PeriodFilter,
        prompt: &mut dyn Prompt,
    ) -> Result<Option<RosterEntry>> {
        let message = format!("Unknown ID: {subject_id}. Enter student name:");
        let Some(name) = prompt.ask(&message).await else {
            tracing::debug!(subject_id, "onboarding cancelled");
            return Ok(None);
        };

        let period = match filter.single() {
            Some(period) => period,
            None => {
                let answer = prompt
                    .ask("Enter this student's period (1-6):")
                    .await
                    .unwrap_or_default();
                answer
                    .parse::<Period>()
                    .map_err(|_| Error::InvalidPeriod(answer))?
            }
        };

        let entry = RosterEntry {
            name,
            period: Some(period),
        };
        self.upsert(subject_id, entry.clone());
        Ok(Some(entry))
    }

    /// Inserts or replaces one entry and queues the remote upsert.
    pub fn upsert(&mut self, subject_id: &str, entry: RosterEntry) {
        tracing::info!(subject_id, name = %entry.name, "roster entry upserted");
        self.entries.insert(subject_id.to_string(), entry.clone());
        self.outbox.push(RemoteWrite::UpsertStudent {
            id: subject_id.to_string(),
            entry,
        });
    }

    /// Swaps in a remote roster snapshot.
    pub fn replace_all(&mut self, roster: Roster) {
        tracing::debug!(entries = roster.len(), "roster replaced");
        self.entries = roster;
    }

    /// Imports a roster CSV, upserting every well-formed row.
    ///
    /// The file is rejected as a whole when it lacks an id column, a period
    /// column, or both name columns. Rows missing any of id, first name, last
    /// name or a valid period are skipped and counted.
    pub fn import_csv<R: Read>(&mut self, reader: R) -> Result<ImportReport> {
        let mut csv = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv.headers()?.clone();
        let find = |aliases: &[&str]| {
            headers.iter().position(|h| {
                let h = h.trim_start_matches('\u{feff}').to_lowercase();
                aliases.contains(&h.as_str())
            })
        };
        let id_col = find(ID_HEADERS);
        let first_col = find(FIRST_HEADERS);
        let last_col = find(LAST_HEADERS);
        let period_col = find(PERIOD_HEADERS);

        let (id_col, period_col) = match (id_col, period_col) {
            (Some(id), Some(period)) if first_col.is_some() || last_col.is_some() => (id, period),
            _ => {
                let mut missing = Vec::new();
                if id_col.is_none() {
                    missing.push("studentId");
                }
                if first_col.is_none() && last_col.is_none() {
                    missing.push("firstName/lastName");
                }
                if period_col.is_none() {
                    missing.push("period");
                }
                return Err(Error::ImportHeaders {
                    missing: missing.join(", "),
                });
            }
        };

        let mut report = ImportReport::default();
        for (line, record) in csv.records().enumerate() {
            let record = record?;
            let field = |col: Option<usize>| col.and_then(|c| record.get(c)).unwrap_or("").trim();

            let subject_id = field(Some(id_col));
            let first = field(first_col);
            let last = field(last_col);
            let period = field(Some(period_col)).parse::<Period>().ok();

            match period {
                Some(period) if !subject_id.is_empty() && !first.is_empty() && !last.is_empty() => {
                    let entry = RosterEntry {
                        name: format!("{first} {last}"),
                        period: Some(period),
                    };
                    self.upsert(subject_id, entry);
                    report.imported += 1;
                }
                _ => {
                    tracing::debug!(row = line + 2, "MalformedImportRow: skipped");
                    report.skipped += 1;
                }
            }
        }

        tracing::info!(
            imported = report.imported,
            skipped = report.skipped,
            "roster imported"
        );
        Ok(report)
    }
}

#[cfg(test)]
#[path = "roster_tests.rs"]
mod tests;
