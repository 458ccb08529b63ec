// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for hp-core operations.

use thiserror::Error;

/// All possible errors that can occur in hp-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid period: '{0}'\n  hint: periods are whole numbers from 1 to 6")]
    InvalidPeriod(String),

    #[error("invalid period filter: '{0}'\n  hint: use a period from 1 to 6, or 'all'")]
    InvalidPeriodFilter(String),

    #[error("pass not found: {0}")]
    PassNotFound(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupted data: {0}")]
    CorruptedData(String),
}

/// A specialized Result type for hp-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
