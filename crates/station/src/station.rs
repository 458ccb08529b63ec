// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The station: every core component plus its durable slots.
//!
//! A `Station` is owned by exactly one control loop (the terminal runtime or
//! a one-shot command). Handlers run to completion and persist the slots they
//! touched before returning. User-visible outcomes of scan handling are
//! queued as notices rather than returned.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use hp_core::{ClockSource, NewPass, Pass, Period, PeriodFilter, Roster};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::admin::{AdminOutcome, AdminSession, AdminState, PendingAction, Tick, UNLOCK_TTL_SECS};
use crate::admission::AdmissionController;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::notify::Notice;
use crate::prompt::{Alert, Prompt};
use crate::roster::{ImportReport, RosterResolver};
use crate::scan::{InputEvent, ScanDecoder};
use crate::slots::{Slot, SlotStore};
use crate::sync::{Outbox, SyncEvent};

/// Upper bound for the station time limit, in minutes.
pub const MAX_MINUTES_CAP: u32 = 120;

/// Destination and time limit applied to scanned starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationSettings {
    pub destination: String,
    pub max_minutes: u32,
}

/// A pass typed in by hand, outside the scan toggle.
#[derive(Debug, Clone, Default)]
pub struct ManualStart {
    pub name: String,
    pub subject_id: Option<String>,
    pub destination: Option<String>,
    pub period: Option<Period>,
    pub max_minutes: Option<u32>,
}

pub struct Station {
    slots: SlotStore,
    clock: Arc<dyn ClockSource>,
    scan_mode: bool,
    settings: StationSettings,
    filter: PeriodFilter,
    last_scan: Option<String>,
    decoder: ScanDecoder,
    admin: AdminSession,
    roster: RosterResolver,
    passes: AdmissionController,
    notices: Vec<Notice>,
}

impl Station {
    /// Restores a station from the slot store under `state_dir`.
    pub fn open(
        state_dir: &Path,
        config: &Config,
        clock: Arc<dyn ClockSource>,
        outbox: Outbox,
    ) -> Result<Self> {
        let slots = SlotStore::open(state_dir)?;

        let default_settings = StationSettings {
            destination: config.defaults.destination.clone(),
            max_minutes: config.defaults.max_minutes.min(MAX_MINUTES_CAP),
        };
        let settings = slots.load_or(Slot::Station, default_settings);
        let admin = AdminSession::restore(
            slots.load(Slot::AdminBadge),
            slots.load(Slot::AdminPending),
            slots.load(Slot::AdminExpiresAt),
        );
        let roster = RosterResolver::new(slots.load(Slot::Roster), outbox.clone());
        let passes = AdmissionController::new(
            slots.load(Slot::Active),
            slots.load(Slot::History),
            clock.clone(),
            outbox,
        );

        let mut station = Station {
            scan_mode: slots.load(Slot::ScanMode),
            filter: slots.load(Slot::PeriodFilter),
            last_scan: slots.load(Slot::LastScan),
            slots,
            clock,
            settings,
            decoder: ScanDecoder::new(),
            admin,
            roster,
            passes,
            notices: Vec::new(),
        };
        station.refresh_decoder();
        tracing::debug!(
            active = station.passes.active().len(),
            history = station.passes.history().len(),
            roster = station.roster.entries().len(),
            "station restored"
        );
        Ok(station)
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn scan_mode(&self) -> bool {
        self.scan_mode
    }

    pub fn settings(&self) -> &StationSettings {
        &self.settings
    }

    pub fn filter(&self) -> PeriodFilter {
        self.filter
    }

    pub fn last_scan(&self) -> Option<&str> {
        self.last_scan.as_deref()
    }

    pub fn decoder(&self) -> &ScanDecoder {
        &self.decoder
    }

    pub fn admin(&self) -> &AdminSession {
        &self.admin
    }

    pub fn admin_state(&self) -> AdminState {
        self.admin.state()
    }

    pub fn roster(&self) -> &RosterResolver {
        &self.roster
    }

    pub fn passes(&self) -> &AdmissionController {
        &self.passes
    }

    /// Queues a notice for the surface.
    pub fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    /// Queues the notice for a failed operation, if it failed.
    pub fn notify_result<T>(&mut self, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.notify(Notice::from_error(&e));
                None
            }
        }
    }

    /// Drains queued notices, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // --- scan input ---

    /// Feeds one input event to the decoder, handling any completed code.
    pub async fn handle_input(
        &mut self,
        event: InputEvent,
        now: Instant,
        prompt: &mut dyn Prompt,
        alert: &mut dyn Alert,
    ) {
        if let Some(code) = self.decoder.feed(event, now) {
            self.handle_code(&code, prompt, alert).await;
        }
    }

    /// Handles the decoder's inactivity deadline.
    pub async fn handle_scan_timer(
        &mut self,
        now: Instant,
        prompt: &mut dyn Prompt,
        alert: &mut dyn Alert,
    ) {
        if let Some(code) = self.decoder.fire(now) {
            self.handle_code(&code, prompt, alert).await;
        }
    }

    /// Routes one decoded code: to the pending admin action if there is one,
    /// otherwise through roster resolution and the scan toggle.
    pub async fn handle_code(
        &mut self,
        code: &str,
        prompt: &mut dyn Prompt,
        alert: &mut dyn Alert,
    ) {
        tracing::debug!(code, "scan decoded");
        self.last_scan = Some(code.to_string());
        self.persist(Slot::LastScan);

        if self.admin.is_pending() {
            self.consume_admin_code(code);
            return;
        }

        let resolved = match self.roster.resolve(code, self.filter, prompt).await {
            Ok(Some(resolved)) => resolved,
            Ok(None) => return,
            Err(e) => {
                self.notify(Notice::from_error(&e));
                return;
            }
        };
        self.persist(Slot::Roster);

        let open_id = self
            .passes
            .find_open_by_name(&resolved.name)
            .map(|p| p.id.clone());
        if let Some(id) = open_id {
            self.end_pass(&id, prompt, alert).await;
            return;
        }

        let new = NewPass {
            subject_name: resolved.name.clone(),
            subject_id: Some(resolved.subject_id),
            destination: self.settings.destination.clone(),
            period: Some(resolved.period),
            max_minutes: self.settings.max_minutes,
        };
        match self.passes.start_pass(new) {
            Ok(pass) => {
                self.persist(Slot::Active);
                self.notify(Notice::success(format!(
                    "Pass started for {} (P{})",
                    pass.subject_name, resolved.period
                )));
                if self.filter != PeriodFilter::One(resolved.period) {
                    self.set_filter(PeriodFilter::One(resolved.period));
                }
            }
            Err(e) => self.notify(Notice::from_error(&e)),
        }
    }

    // --- admin ---

    fn consume_admin_code(&mut self, code: &str) {
        let result = self.admin.consume_code(code, self.clock.now());
        self.persist_admin();
        self.refresh_decoder();
        match result {
            Ok(AdminOutcome::Enrolled { .. }) => self.notify(Notice::success("Admin badge set ✅")),
            Ok(AdminOutcome::Unlocked { .. }) => self.notify(Notice::success(format!(
                "Admin unlocked for {UNLOCK_TTL_SECS}s"
            ))),
            Err(e) => self.notify(Notice::from_error(&e)),
        }
    }

    /// A badge code typed by hand; handled exactly like a scanned one.
    pub fn enter_badge(&mut self, code: &str) {
        if !self.admin.is_pending() {
            self.notify(Notice::from_error(&Error::NothingPending));
            return;
        }
        self.consume_admin_code(code);
    }

    pub fn request_enroll(&mut self) -> Result<()> {
        self.admin.request_enroll()?;
        self.persist_admin();
        self.refresh_decoder();
        self.notify(Notice::info("Scan your admin badge to set it"));
        Ok(())
    }

    pub fn request_unlock(&mut self) -> Result<()> {
        self.admin.request_unlock()?;
        self.persist_admin();
        self.refresh_decoder();
        self.notify(Notice::info("Scan admin badge to unlock"));
        Ok(())
    }

    pub fn lock_admin(&mut self) {
        self.admin.lock();
        self.persist_admin();
        self.refresh_decoder();
        self.notify(Notice::success("Admin locked"));
    }

    /// The once-a-second admin countdown.
    pub fn admin_tick(&mut self) -> Tick {
        let tick = self.admin.tick(self.clock.now());
        if tick == Tick::Expired {
            self.persist_admin();
            self.refresh_decoder();
            self.notify(Notice::info("Admin locked"));
        }
        tick
    }

    // --- settings ---

    pub fn set_scan_mode(&mut self, on: bool) {
        self.scan_mode = on;
        self.persist(Slot::ScanMode);
        self.refresh_decoder();
    }

    pub fn set_destination(&mut self, destination: &str) -> Result<()> {
        let destination = destination.trim();
        if destination.is_empty() {
            return Err(Error::FieldEmpty {
                field: "destination",
            });
        }
        self.settings.destination = destination.to_string();
        self.persist(Slot::Station);
        Ok(())
    }

    /// Sets the time limit, clamped to `0..=120`. Returns the stored value.
    pub fn set_max_minutes(&mut self, minutes: u32) -> u32 {
        self.settings.max_minutes = minutes.min(MAX_MINUTES_CAP);
        self.persist(Slot::Station);
        self.settings.max_minutes
    }

    pub fn set_filter(&mut self, filter: PeriodFilter) {
        self.filter = filter;
        self.persist(Slot::PeriodFilter);
    }

    pub fn cycle_filter(&mut self) -> PeriodFilter {
        self.set_filter(self.filter.next());
        self.filter
    }

    // --- direct lifecycle ---

    /// Starts a pass for a typed name. The toggle does not apply: a second
    /// pass for the same name is admitted if capacity allows.
    pub fn start_manual(&mut self, start: ManualStart) -> Result<Pass> {
        let name = start.name.trim();
        if name.is_empty() {
            return Err(Error::FieldEmpty { field: "name" });
        }
        let new = NewPass {
            subject_name: name.to_string(),
            subject_id: start.subject_id,
            destination: start
                .destination
                .unwrap_or_else(|| self.settings.destination.clone()),
            period: start.period.or_else(|| self.filter.single()),
            max_minutes: start
                .max_minutes
                .unwrap_or(self.settings.max_minutes)
                .min(MAX_MINUTES_CAP),
        };
        let pass = self.passes.start_pass(new)?;
        self.persist(Slot::Active);
        Ok(pass)
    }

    /// Starts a pass for a roster entry. Requires an unlocked admin session.
    pub fn start_from_roster(&mut self, subject_id: &str) -> Result<Pass> {
        match self.admin.state() {
            AdminState::Unlocked { expiry } if expiry <= self.clock.now() => {
                return Err(Error::AdminSessionExpired);
            }
            AdminState::Unlocked { .. } => {}
            _ => return Err(Error::AdminRequired),
        }
        let entry = self
            .roster
            .get(subject_id)
            .cloned()
            .ok_or_else(|| Error::UnknownSubject(subject_id.to_string()))?;
        let period = self
            .filter
            .single()
            .or(entry.period)
            .ok_or(Error::NoPeriodAvailable)?;

        let pass = self.passes.start_pass(NewPass {
            subject_name: entry.name.trim().to_string(),
            subject_id: Some(subject_id.to_string()),
            destination: self.settings.destination.clone(),
            period: Some(period),
            max_minutes: self.settings.max_minutes,
        })?;
        self.persist(Slot::Active);
        self.notify(Notice::success(format!(
            "Pass started for {} (P{})",
            pass.subject_name, period
        )));
        Ok(pass)
    }

    /// Ends an open pass; unknown ids are a no-op returning `None`.
    pub async fn end_pass(
        &mut self,
        id: &str,
        prompt: &mut dyn Prompt,
        alert: &mut dyn Alert,
    ) -> Option<Pass> {
        let pass = self.passes.end_pass(id, prompt, alert).await?;
        self.persist(Slot::Active);
        self.persist(Slot::History);
        self.notify(Notice::info(format!("Pass ended for {}", pass.subject_name)));
        Some(pass)
    }

    // --- roster & sync ---

    pub fn import_roster(&mut self, path: &Path) -> Result<ImportReport> {
        let file = std::fs::File::open(path)?;
        let report = self.roster.import_csv(file)?;
        self.persist(Slot::Roster);
        self.notify(Notice::success(format!(
            "Imported/updated {} students with periods",
            report.imported
        )));
        Ok(report)
    }

    /// Applies a remote snapshot delivered by the reconciler.
    pub fn apply_sync(&mut self, event: SyncEvent) {
        match event {
            SyncEvent::Roster(roster) => {
                self.roster.replace_all(roster);
                self.persist(Slot::Roster);
            }
            SyncEvent::Active(passes) => {
                self.passes.replace_active(passes);
                self.persist(Slot::Active);
            }
        }
    }

    /// Roster entries visible under the current filter.
    pub fn visible_roster(&self) -> Roster {
        self.roster
            .in_period(self.filter)
            .into_iter()
            .map(|(id, entry)| (id.to_string(), entry.clone()))
            .collect()
    }

    // --- persistence ---

    fn refresh_decoder(&mut self) {
        self.decoder
            .set_active(self.scan_mode || self.admin.is_pending());
    }

    fn persist_admin(&self) {
        self.persist(Slot::AdminBadge);
        self.persist(Slot::AdminPending);
        self.persist(Slot::AdminExpiresAt);
    }

    /// Writes one slot from the in-memory value. Failures are logged; the
    /// in-memory state stays authoritative until the next successful write.
    fn persist(&self, slot: Slot) {
        let result = match slot {
            Slot::ScanMode => self.slots.save(slot, &self.scan_mode),
            Slot::Station => self.slots.save(slot, &self.settings),
            Slot::Active => self.slots.save(slot, self.passes.active()),
            Slot::History => self.slots.save(slot, self.passes.history()),
            Slot::Roster => self.slots.save(slot, self.roster.entries()),
            Slot::AdminBadge => self.slots.save(slot, &self.admin.badge_id()),
            Slot::AdminPending => self.slots.save::<PendingAction>(slot, &self.admin.pending()),
            Slot::AdminExpiresAt => self.slots.save(slot, &self.admin.unlock_expiry()),
            Slot::PeriodFilter => self.slots.save(slot, &self.filter),
            Slot::LastScan => self.slots.save(slot, &self.last_scan),
        };
        if let Err(e) = result {
            tracing::warn!(slot = slot.name(), error = %e, "failed to persist slot");
        }
    }

    /// Writes every slot.
    pub fn save_all(&self) {
        for slot in Slot::ALL {
            self.persist(slot);
        }
    }
}

#[cfg(test)]
#[path = "station_tests.rs"]
mod tests;
