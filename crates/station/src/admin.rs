// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Admin privilege escalation.
//!
//! One badge is enrolled per station. Scanning it while an unlock is pending
//! grants a short admin window; the window closes on manual lock or when the
//! once-a-second tick finds it expired.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use hp_core::admin_badge_digits;

/// Length of an admin unlock window.
pub const UNLOCK_TTL_SECS: i64 = 180;

/// The admin action waiting for the next scanned code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingAction {
    #[default]
    None,
    Enroll,
    Unlock,
}

/// Observable session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminState {
    Unset,
    EnrollPending,
    Locked,
    UnlockPending,
    Unlocked { expiry: DateTime<Utc> },
}

impl AdminState {
    pub fn label(&self) -> &'static str {
        match self {
            AdminState::Unset => "unset",
            AdminState::EnrollPending => "waiting for enroll scan",
            AdminState::Locked => "locked",
            AdminState::UnlockPending => "waiting for unlock scan",
            AdminState::Unlocked { .. } => "unlocked",
        }
    }
}

/// Successful result of consuming a code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminOutcome {
    Enrolled { badge_id: String },
    Unlocked { expiry: DateTime<Utc> },
}

/// Result of the once-a-second countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Not unlocked; nothing to count.
    Idle,
    Remaining(u64),
    /// The window just closed.
    Expired,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminSession {
    badge_id: Option<String>,
    pending: PendingAction,
    unlock_expiry: Option<DateTime<Utc>>,
}

impl AdminSession {
    /// Rebuilds a session from its persisted parts.
    ///
    /// A pending action that cannot apply to the stored badge state is
    /// dropped, as is an expiry without a badge.
    pub fn restore(
        badge_id: Option<String>,
        pending: PendingAction,
        unlock_expiry: Option<DateTime<Utc>>,
    ) -> Self {
        let pending = match (pending, &badge_id) {
            (PendingAction::Enroll, None) | (PendingAction::Unlock, Some(_)) => pending,
            _ => PendingAction::None,
        };
        let unlock_expiry = unlock_expiry.filter(|_| badge_id.is_some());
        AdminSession {
            badge_id,
            pending,
            unlock_expiry,
        }
    }

    pub fn badge_id(&self) -> Option<&str> {
        self.badge_id.as_deref()
    }

    pub fn pending(&self) -> PendingAction {
        self.pending
    }

    pub fn unlock_expiry(&self) -> Option<DateTime<Utc>> {
        self.unlock_expiry
    }

    pub fn is_pending(&self) -> bool {
        self.pending != PendingAction::None
    }

    pub fn state(&self) -> AdminState {
        if self.pending == PendingAction::Enroll {
            return AdminState::EnrollPending;
        }
        if self.badge_id.is_none() {
            return AdminState::Unset;
        }
        if self.pending == PendingAction::Unlock {
            return AdminState::UnlockPending;
        }
        match self.unlock_expiry {
            Some(expiry) => AdminState::Unlocked { expiry },
            None => AdminState::Locked,
        }
    }

    /// `Unset → EnrollPending`.
    pub fn request_enroll(&mut self) -> Result<()> {
        match self.state() {
            AdminState::Unset => {
                self.pending = PendingAction::Enroll;
                Ok(())
            }
            other => Err(Error::AdminRequestRejected {
                action: "enroll",
                state: other.label(),
            }),
        }
    }

    /// `Locked → UnlockPending`.
    pub fn request_unlock(&mut self) -> Result<()> {
        match self.state() {
            AdminState::Locked => {
                self.pending = PendingAction::Unlock;
                Ok(())
            }
            AdminState::Unset => Err(Error::NoAdminBadge),
            other => Err(Error::AdminRequestRejected {
                action: "unlock",
                state: other.label(),
            }),
        }
    }

    /// Routes a decoded code to the pending action.
    ///
    /// Every outcome clears the pending action: a failed enroll returns to
    /// `Unset`, a failed unlock to `Locked`.
    pub fn consume_code(&mut self, code: &str, now: DateTime<Utc>) -> Result<AdminOutcome> {
        let action = std::mem::take(&mut self.pending);
        let digits = admin_badge_digits(code);
        match action {
            PendingAction::None => Err(Error::NothingPending),
            PendingAction::Enroll => {
                let digits = digits.ok_or(Error::BadgeUnreadable)?;
                self.badge_id = Some(digits.to_string());
                self.unlock_expiry = None;
                tracing::info!("admin badge enrolled");
                Ok(AdminOutcome::Enrolled {
                    badge_id: digits.to_string(),
                })
            }
            PendingAction::Unlock => {
                if digits.is_none() || self.badge_id.as_deref() != digits {
                    tracing::info!("admin unlock rejected");
                    return Err(Error::AdminBadgeMismatch);
                }
                let expiry = now + Duration::seconds(UNLOCK_TTL_SECS);
                self.unlock_expiry = Some(expiry);
                tracing::info!(%expiry, "admin unlocked");
                Ok(AdminOutcome::Unlocked { expiry })
            }
        }
    }

    /// Seconds left in the unlock window, rounded up.
    pub fn remaining_secs(&self, now: DateTime<Utc>) -> u64 {
        match self.unlock_expiry {
            Some(expiry) => {
                let ms = (expiry - now).num_milliseconds().max(0);
                u64::try_from((ms + 999) / 1000).unwrap_or(0)
            }
            None => 0,
        }
    }

    /// Recomputes the countdown, locking when it reaches zero.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Tick {
        if self.unlock_expiry.is_none() {
            return Tick::Idle;
        }
        match self.remaining_secs(now) {
            0 => {
                self.unlock_expiry = None;
                self.pending = PendingAction::None;
                tracing::info!("admin session expired");
                Tick::Expired
            }
            n => Tick::Remaining(n),
        }
    }

    /// Manual lock: clears the window and any pending action.
    pub fn lock(&mut self) {
        self.unlock_expiry = None;
        self.pending = PendingAction::None;
    }

    pub fn is_unlocked(&self, now: DateTime<Utc>) -> bool {
        self.remaining_secs(now) > 0
    }
}

#[cfg(test)]
#[path = "admin_tests.rs"]
mod tests;
