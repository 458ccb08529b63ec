// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// All possible errors surfaced by the station.
///
/// Errors provide user-friendly messages with hints for common issues.
/// Remote I/O failures never appear here: they are logged by the sync layer
/// and dropped.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{destination} (Period {period}): limit of {limit} reached")]
    AdmissionDenied {
        destination: String,
        period: String,
        limit: usize,
    },

    #[error("could not read digits from badge\n  hint: admin badges need a run of at least 4 digits")]
    BadgeUnreadable,

    #[error("badge not recognized for admin")]
    AdminBadgeMismatch,

    #[error("admin session expired")]
    AdminSessionExpired,

    #[error("admin required to start a pass from the roster\n  hint: unlock with the admin badge first")]
    AdminRequired,

    #[error("cannot {action} while admin is {state}")]
    AdminRequestRejected {
        action: &'static str,
        state: &'static str,
    },

    #[error("no admin badge enrolled\n  hint: enroll a badge before unlocking")]
    NoAdminBadge,

    #[error("start enroll or unlock first")]
    NothingPending,

    #[error("select a period or add one to the roster entry")]
    NoPeriodAvailable,

    #[error("invalid period '{0}', scan cancelled\n  hint: periods are whole numbers from 1 to 6")]
    InvalidPeriod(String),

    #[error("CSV needs: studentId, firstName, lastName, period\n  hint: missing {missing}")]
    ImportHeaders { missing: String },

    #[error("pass not found: {0}")]
    PassNotFound(String),

    #[error("subject not in roster: {0}")]
    UnknownSubject(String),

    #[error("{field} cannot be empty")]
    FieldEmpty { field: &'static str },

    #[error("station already running on {0}\n  hint: quit the running station before changing its state from the command line")]
    StationBusy(String),

    #[error("interactive station requires a terminal (TTY)")]
    TtyRequired,

    #[error("already initialized: {0}\n  hint: edit config.toml directly to change settings")]
    AlreadyInitialized(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{0}")]
    Core(#[from] hp_core::Error),
}

/// A specialized Result type for station operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
