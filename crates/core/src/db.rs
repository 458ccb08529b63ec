// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! SQLite-backed remote store for passes and students.
//!
//! Every row is scoped to a tenant. Only the remote server opens this
//! database; stations keep their own state in JSON slots.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

use crate::error::{Error, Result};
use crate::pass::PassRow;
use crate::roster::StudentRow;

/// SQL schema for the remote store.
pub const SCHEMA: &str = r#"
-- One row per pass; end_time is NULL while the pass is open
CREATE TABLE IF NOT EXISTS passes (
    id TEXT PRIMARY KEY,
    student_id TEXT,
    student_name TEXT NOT NULL,
    destination TEXT NOT NULL,
    period TEXT,
    start_time TEXT NOT NULL,
    end_time TEXT,
    max_minutes INTEGER NOT NULL DEFAULT 0,
    over_limit INTEGER NOT NULL DEFAULT 0,
    late_reason TEXT NOT NULL DEFAULT '',
    tenant_id TEXT NOT NULL
);

-- Roster, one row per student per tenant
CREATE TABLE IF NOT EXISTS students (
    student_id TEXT NOT NULL,
    name TEXT NOT NULL,
    period TEXT,
    tenant_id TEXT NOT NULL,
    UNIQUE (student_id, tenant_id)
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_passes_open ON passes(tenant_id, end_time);
CREATE INDEX IF NOT EXISTS idx_passes_start ON passes(start_time DESC);
"#;

const PASS_COLUMNS: &str = "id, student_id, student_name, destination, period, start_time,
     end_time, max_minutes, over_limit, late_reason, tenant_id";

/// Fixed-width RFC 3339 so text ordering matches time ordering.
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Parse an RFC3339 timestamp from the database.
fn parse_timestamp(
    value: &str,
    column: &str,
) -> std::result::Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(Error::CorruptedData(format!(
                    "invalid timestamp '{value}' in column '{column}'"
                ))),
            )
        })
}

fn pass_from_row(row: &Row<'_>) -> std::result::Result<PassRow, rusqlite::Error> {
    let start_str: String = row.get(5)?;
    let end_str: Option<String> = row.get(6)?;
    Ok(PassRow {
        id: row.get(0)?,
        student_id: row.get(1)?,
        student_name: row.get(2)?,
        destination: row.get(3)?,
        period: row.get(4)?,
        start_time: parse_timestamp(&start_str, "start_time")?,
        end_time: end_str
            .map(|s| parse_timestamp(&s, "end_time"))
            .transpose()?,
        max_minutes: row.get(7)?,
        over_limit: row.get(8)?,
        late_reason: row.get(9)?,
        tenant_id: row.get(10)?,
    })
}

/// SQLite database connection with remote store operations.
pub struct Database {
    /// The underlying SQLite connection.
    pub conn: Connection,
}

impl Database {
    /// Open a database connection at the given path, creating the schema if needed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )?;
        conn.execute_batch(SCHEMA)?;
        Ok(Database { conn })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Database { conn })
    }

    /// Insert a pass row.
    pub fn insert_pass(&self, row: &PassRow) -> Result<()> {
        self.conn.execute(
            "INSERT INTO passes (id, student_id, student_name, destination, period,
             start_time, end_time, max_minutes, over_limit, late_reason, tenant_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                row.id,
                row.student_id,
                row.student_name,
                row.destination,
                row.period,
                format_timestamp(&row.start_time),
                row.end_time.as_ref().map(format_timestamp),
                row.max_minutes,
                row.over_limit,
                row.late_reason,
                row.tenant_id,
            ],
        )?;
        Ok(())
    }

    /// Close an open pass. Returns the number of rows updated, which is 0
    /// when the pass is unknown, belongs to another tenant, or is already closed.
    pub fn close_pass(
        &self,
        tenant_id: &str,
        id: &str,
        end_time: &DateTime<Utc>,
        over_limit: bool,
        late_reason: &str,
    ) -> Result<usize> {
        let affected = self.conn.execute(
            "UPDATE passes SET end_time = ?1, over_limit = ?2, late_reason = ?3
             WHERE id = ?4 AND tenant_id = ?5 AND end_time IS NULL",
            params![
                format_timestamp(end_time),
                over_limit,
                late_reason,
                id,
                tenant_id
            ],
        )?;
        Ok(affected)
    }

    /// Get a pass by ID.
    pub fn get_pass(&self, id: &str) -> Result<PassRow> {
        let sql = format!("SELECT {PASS_COLUMNS} FROM passes WHERE id = ?1");
        let pass = self
            .conn
            .query_row(&sql, params![id], pass_from_row)
            .optional()?;
        pass.ok_or_else(|| Error::PassNotFound(id.to_string()))
    }

    /// All open passes for a tenant, newest start first.
    pub fn active_passes(&self, tenant_id: &str) -> Result<Vec<PassRow>> {
        let sql = format!(
            "SELECT {PASS_COLUMNS} FROM passes
             WHERE tenant_id = ?1 AND end_time IS NULL
             ORDER BY start_time DESC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![tenant_id], pass_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Insert or update a student, idempotent on `(student_id, tenant_id)`.
    pub fn upsert_student(&self, row: &StudentRow) -> Result<()> {
        self.conn.execute(
            "INSERT INTO students (student_id, name, period, tenant_id)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (student_id, tenant_id)
             DO UPDATE SET name = excluded.name, period = excluded.period",
            params![row.student_id, row.name, row.period, row.tenant_id],
        )?;
        Ok(())
    }

    /// All students for a tenant, ordered by id.
    pub fn students(&self, tenant_id: &str) -> Result<Vec<StudentRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT student_id, name, period, tenant_id FROM students
             WHERE tenant_id = ?1 ORDER BY student_id",
        )?;
        let rows = stmt
            .query_map(params![tenant_id], |row| {
                Ok(StudentRow {
                    student_id: row.get(0)?,
                    name: row.get(1)?,
                    period: row.get(2)?,
                    tenant_id: row.get(3)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

#[cfg(test)]
#[path = "db_tests.rs"]
mod tests;
