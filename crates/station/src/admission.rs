// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Pass lifecycle under per-destination capacity limits.
//!
//! Owns the active set and the local history. Every start and end is
//! applied locally first and then queued for the remote store; the remote
//! outcome never feeds back into these methods.

use std::collections::BTreeMap;
use std::sync::Arc;

use hp_core::{generate_unique_pass_id, ClockSource, NewPass, Pass, Period};

use crate::error::{Error, Result};
use crate::prompt::{Alert, Prompt};
use crate::sync::{Outbox, RemoteWrite};

/// Open passes allowed per `(destination, period)`.
pub const ADMISSION_LIMIT: usize = 4;

pub struct AdmissionController {
    /// Open passes, newest first.
    active: Vec<Pass>,
    /// Ended passes, newest first. Never synchronized.
    history: Vec<Pass>,
    clock: Arc<dyn ClockSource>,
    outbox: Outbox,
}

impl AdmissionController {
    pub fn new(
        active: Vec<Pass>,
        history: Vec<Pass>,
        clock: Arc<dyn ClockSource>,
        outbox: Outbox,
    ) -> Self {
        AdmissionController {
            active,
            history,
            clock,
            outbox,
        }
    }

    pub fn active(&self) -> &[Pass] {
        &self.active
    }

    pub fn history(&self) -> &[Pass] {
        &self.history
    }

    pub fn get_active(&self, id: &str) -> Option<&Pass> {
        self.active.iter().find(|p| p.id == id)
    }

    /// Number of open passes for one `(destination, period)` pair.
    pub fn occupancy(&self, destination: &str, period: Option<Period>) -> usize {
        self.active
            .iter()
            .filter(|p| p.destination == destination && p.period == period)
            .count()
    }

    /// Open pass count per destination, across periods.
    pub fn out_by_destination(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for pass in &self.active {
            *counts.entry(pass.destination.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// The newest open pass held by `name`, compared case-insensitively.
    pub fn find_open_by_name(&self, name: &str) -> Option<&Pass> {
        self.active.iter().find(|p| p.is_for(name))
    }

    fn id_taken(&self, id: &str) -> bool {
        self.active.iter().chain(self.history.iter()).any(|p| p.id == id)
    }

    /// Opens a pass if its `(destination, period)` has room.
    pub fn start_pass(&mut self, new: NewPass) -> Result<Pass> {
        if self.occupancy(&new.destination, new.period) >= ADMISSION_LIMIT {
            tracing::info!(
                destination = %new.destination,
                period = ?new.period,
                "admission denied"
            );
            return Err(Error::AdmissionDenied {
                destination: new.destination,
                period: new
                    .period
                    .map_or_else(|| "none".to_string(), |p| p.to_string()),
                limit: ADMISSION_LIMIT,
            });
        }

        let now = self.clock.now();
        let id = generate_unique_pass_id(&new.subject_name, &now, |id| self.id_taken(id));
        let pass = Pass::open(id, new, now);
        tracing::info!(
            id = %pass.id,
            subject = %pass.subject_name,
            destination = %pass.destination,
            "pass started"
        );
        self.active.insert(0, pass.clone());
        self.outbox.push(RemoteWrite::InsertPass(pass.clone()));
        Ok(pass)
    }

    /// Ends an open pass. Unknown ids are a no-op.
    ///
    /// An over-limit return chimes and asks for a reason; a cancelled
    /// prompt records an empty reason and the pass still ends.
    pub async fn end_pass(
        &mut self,
        id: &str,
        prompt: &mut dyn Prompt,
        alert: &mut dyn Alert,
    ) -> Option<Pass> {
        let index = self.active.iter().position(|p| p.id == id)?;
        let now = self.clock.now();
        let over_limit = self.active[index].exceeds_limit(now);

        let late_reason = if over_limit {
            alert.chime();
            let message = format!(
                "Late return for {}. Enter reason:",
                self.active[index].subject_name
            );
            prompt.ask(&message).await.unwrap_or_default()
        } else {
            String::new()
        };

        let mut pass = self.active.remove(index);
        pass.close(now, over_limit, late_reason);
        tracing::info!(
            id = %pass.id,
            subject = %pass.subject_name,
            over_limit,
            "pass ended"
        );
        self.history.insert(0, pass.clone());
        self.outbox.push(RemoteWrite::ClosePass(pass.clone()));
        Some(pass)
    }

    /// Swaps in a remote snapshot. History is untouched.
    pub fn replace_active(&mut self, passes: Vec<Pass>) {
        let open: Vec<Pass> = passes.into_iter().filter(Pass::is_open).collect();
        tracing::debug!(
            before = self.active.len(),
            after = open.len(),
            "active set replaced"
        );
        self.active = open;
    }
}

#[cfg(test)]
#[path = "admission_tests.rs"]
mod tests;
