// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! hp-core: Shared library for the hall pass station
//!
//! This crate provides the data model, clock abstraction, wire protocol and
//! SQLite store shared by the `hallpass` station and the `hp-remote` server.

pub mod badge;
pub mod clock;
pub mod db;
pub mod error;
pub mod pass;
pub mod period;
pub mod protocol;
pub mod roster;

pub use badge::{admin_badge_digits, subject_id_from_code};
pub use clock::{ClockSource, ManualClock, SystemClock};
pub use db::Database;
pub use error::{Error, Result};
pub use pass::{generate_pass_id, generate_unique_pass_id, NewPass, Pass, PassRow};
pub use period::{Period, PeriodFilter};
pub use protocol::{ClientMessage, ServerMessage};
pub use roster::{roster_from_rows, Roster, RosterEntry, StudentRow};
