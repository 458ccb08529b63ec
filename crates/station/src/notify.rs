// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transient, severity-tagged user notifications.

use std::time::Duration;

use crate::error::Error;

/// How long the terminal surface shows a notice.
pub const NOTICE_TTL: Duration = Duration::from_millis(2_500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub tone: Tone,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Notice {
            tone: Tone::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice {
            tone: Tone::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Notice {
            tone: Tone::Info,
            message: message.into(),
        }
    }

    /// Maps a user-visible error to a notice: the first line of its message,
    /// without the hint.
    pub fn from_error(err: &Error) -> Self {
        let text = err.to_string();
        let headline = text.lines().next().unwrap_or_default().to_string();
        match err {
            Error::NothingPending => Notice::info(headline),
            _ => Notice::error(headline),
        }
    }
}

#[cfg(test)]
#[path = "notify_tests.rs"]
mod tests;
