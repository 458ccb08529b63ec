// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Durable local slots.
//!
//! Each slot holds one JSON value in `<state_dir>/slots/<name>.json` and is
//! the sole source of truth when the remote store is unreachable. Writes go
//! to a temporary file that is fsynced and renamed into place, so a crash
//! leaves either the old value or the new one.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;

const SLOTS_DIR_NAME: &str = "slots";

/// A named durable cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    ScanMode,
    Station,
    Active,
    History,
    Roster,
    AdminBadge,
    AdminPending,
    AdminExpiresAt,
    PeriodFilter,
    LastScan,
}

impl Slot {
    pub const ALL: [Slot; 10] = [
        Slot::ScanMode,
        Slot::Station,
        Slot::Active,
        Slot::History,
        Slot::Roster,
        Slot::AdminBadge,
        Slot::AdminPending,
        Slot::AdminExpiresAt,
        Slot::PeriodFilter,
        Slot::LastScan,
    ];

    /// File stem of the slot.
    pub fn name(self) -> &'static str {
        match self {
            Slot::ScanMode => "scan_mode",
            Slot::Station => "station",
            Slot::Active => "active",
            Slot::History => "history",
            Slot::Roster => "roster",
            Slot::AdminBadge => "admin_badge",
            Slot::AdminPending => "admin_pending",
            Slot::AdminExpiresAt => "admin_expires_at",
            Slot::PeriodFilter => "period_filter",
            Slot::LastScan => "last_scan",
        }
    }
}

/// JSON slot store rooted at a state directory.
#[derive(Debug, Clone)]
pub struct SlotStore {
    dir: PathBuf,
}

impl SlotStore {
    /// Opens (creating if needed) the slot directory under `state_dir`.
    pub fn open(state_dir: &Path) -> Result<Self> {
        let dir = state_dir.join(SLOTS_DIR_NAME);
        fs::create_dir_all(&dir)?;
        Ok(SlotStore { dir })
    }

    pub fn path(&self, slot: Slot) -> PathBuf {
        self.dir.join(format!("{}.json", slot.name()))
    }

    /// Reads a slot, falling back to `T::default()`.
    pub fn load<T>(&self, slot: Slot) -> T
    where
        T: DeserializeOwned + Default,
    {
        self.load_or(slot, T::default())
    }

    /// Reads a slot, falling back to `default` when the file is missing or
    /// cannot be parsed.
    pub fn load_or<T>(&self, slot: Slot, default: T) -> T
    where
        T: DeserializeOwned,
    {
        let path = self.path(slot);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return default,
            Err(e) => {
                tracing::warn!(slot = slot.name(), error = %e, "unreadable slot, using default");
                return default;
            }
        };
        match serde_json::from_str(&content) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(slot = slot.name(), error = %e, "corrupt slot, using default");
                default
            }
        }
    }

    /// Writes a slot atomically.
    pub fn save<T>(&self, slot: Slot, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let path = self.path(slot);
        let tmp = self.dir.join(format!(".{}.json.tmp", slot.name()));
        let json = serde_json::to_string_pretty(value)?;
        {
            let mut file = File::create(&tmp)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "slots_tests.rs"]
mod tests;
