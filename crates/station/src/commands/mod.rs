// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod history;
pub mod init;
pub mod pass;
pub mod roster;
pub mod set;
pub mod station;
pub mod sync;
#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;

use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Arc;

use hp_core::{ClockSource, SystemClock};
use tokio::sync::mpsc;

use crate::config::{self, Config};
use crate::error::Result;
use crate::station::Station;
use crate::sync::{Backoff, RemoteStore, SyncEvent, SyncReconciler, WsConfig, WsStore};

/// An opened station plus its reconciler, for the life of one command.
pub struct Session {
    pub state_dir: PathBuf,
    pub config: Config,
    pub station: Station,
    sync: SyncReconciler,
    events: mpsc::UnboundedReceiver<SyncEvent>,
    lock: Option<File>,
}

/// Opens the station under the resolved state directory.
///
/// Must be called inside a tokio runtime: the reconciler spawns its writer.
pub fn open(state_dir: Option<PathBuf>) -> Result<Session> {
    let state_dir = config::state_dir(state_dir)?;
    let config = Config::load_with_env(&state_dir)?;
    Session::open_with(state_dir, config, Arc::new(SystemClock))
}

/// Like [`open`], but holds `station.lock` until the session closes.
///
/// Commands that write slots use this so they cannot interleave with a
/// running station, which would overwrite their changes on its next save.
pub fn open_exclusive(state_dir: Option<PathBuf>) -> Result<Session> {
    let state_dir = config::state_dir(state_dir)?;
    fs::create_dir_all(&state_dir)?;
    let lock = station::acquire_lock(&state_dir)?;
    let config = Config::load_with_env(&state_dir)?;
    let session = Session::open_with(state_dir, config, Arc::new(SystemClock))?;
    Ok(session.with_lock(lock))
}

impl Session {
    pub fn open_with(
        state_dir: PathBuf,
        config: Config,
        clock: Arc<dyn ClockSource>,
    ) -> Result<Self> {
        let store = config
            .remote
            .as_ref()
            .map(|remote| Arc::new(WsStore::new(WsConfig::from(remote))) as Arc<dyn RemoteStore>);
        Self::open_with_store(state_dir, config, clock, store)
    }

    /// Opens a session over an explicit store; `None` runs offline.
    pub fn open_with_store(
        state_dir: PathBuf,
        config: Config,
        clock: Arc<dyn ClockSource>,
        store: Option<Arc<dyn RemoteStore>>,
    ) -> Result<Self> {
        let backoff = config
            .remote
            .as_ref()
            .map(Backoff::from)
            .unwrap_or_default();
        let (sync, events) = SyncReconciler::start(store, config.tenant.clone(), backoff);
        let station = Station::open(&state_dir, &config, clock, sync.outbox())?;
        Ok(Session {
            state_dir,
            config,
            station,
            sync,
            events,
            lock: None,
        })
    }

    /// Keeps `lock` held for the life of the session.
    pub fn with_lock(mut self, lock: File) -> Self {
        self.lock = Some(lock);
        self
    }

    pub fn is_online(&self) -> bool {
        self.sync.is_online()
    }

    /// Pulls the remote snapshots once and applies whatever arrived.
    pub async fn bootstrap(&mut self) {
        if let Err(e) = self.sync.bootstrap().await {
            tracing::warn!(error = %e, "bootstrap task failed");
        }
        self.apply_events();
    }

    /// Applies every snapshot already delivered. Returns how many.
    pub fn apply_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events.try_recv() {
            self.station.apply_sync(event);
            applied += 1;
        }
        applied
    }

    /// Splits the session for the interactive loop.
    pub fn into_parts(self) -> (Station, SyncReconciler, mpsc::UnboundedReceiver<SyncEvent>) {
        (self.station, self.sync, self.events)
    }

    /// Flushes queued remote writes (bounded) and drops the session,
    /// releasing its lock last.
    pub async fn close(self) {
        self.sync.shutdown().await;
        drop(self.lock);
    }
}

/// The multi-threaded runtime every command runs on.
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(crate::error::Error::Io)
}
