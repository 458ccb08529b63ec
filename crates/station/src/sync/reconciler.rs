// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Local/remote reconciliation.
//!
//! Local mutations are applied first and mirrored through the [`Outbox`],
//! a single ordered queue drained by one writer task. Remote snapshots come
//! back as [`SyncEvent`]s and replace the local cache wholesale: the last
//! completed full refresh wins over any optimistic local state.
//!
//! Remote failures are logged and dropped. Nothing here is surfaced to the
//! user and nothing is retried.

use std::sync::Arc;
use std::time::Duration;

use hp_core::{roster_from_rows, Pass, PassRow, Roster, RosterEntry, StudentRow};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::store::{PassClose, RemoteStore};
use crate::config::RemoteConfig;

/// How long [`SyncReconciler::shutdown`] waits for queued writes.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(3);

/// A remote mirror of one local mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteWrite {
    InsertPass(Pass),
    ClosePass(Pass),
    UpsertStudent { id: String, entry: RosterEntry },
}

impl RemoteWrite {
    fn label(&self) -> &'static str {
        match self {
            RemoteWrite::InsertPass(_) => "insert_pass",
            RemoteWrite::ClosePass(_) => "close_pass",
            RemoteWrite::UpsertStudent { .. } => "upsert_student",
        }
    }
}

/// Sender half of the remote write queue.
///
/// Pushing never blocks and never fails from the caller's point of view.
#[derive(Debug, Clone)]
pub struct Outbox {
    tx: mpsc::UnboundedSender<RemoteWrite>,
}

impl Outbox {
    fn channel() -> (Self, mpsc::UnboundedReceiver<RemoteWrite>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Outbox { tx }, rx)
    }

    /// An outbox with no writer; every push is dropped.
    pub fn detached() -> Self {
        Self::channel().0
    }

    /// An outbox whose writes are collected by the returned receiver.
    #[cfg(test)]
    pub fn capture() -> (Self, mpsc::UnboundedReceiver<RemoteWrite>) {
        Self::channel()
    }

    pub fn push(&self, write: RemoteWrite) {
        let label = write.label();
        if self.tx.send(write).is_err() {
            tracing::debug!(write = label, "no remote writer, dropping write");
        }
    }
}

/// A remote snapshot to apply on the control loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    Roster(Roster),
    Active(Vec<Pass>),
}

/// Backoff for the subscription loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    pub initial: Duration,
    pub max: Duration,
}

impl Backoff {
    pub fn next(self, current: Duration) -> Duration {
        std::cmp::min(current.saturating_mul(2), self.max)
    }
}

impl From<&RemoteConfig> for Backoff {
    fn from(remote: &RemoteConfig) -> Self {
        Backoff {
            initial: Duration::from_millis(remote.reconnect_initial_delay_ms),
            max: Duration::from_secs(remote.reconnect_max_delay_secs),
        }
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Backoff {
            initial: Duration::from_millis(250),
            max: Duration::from_secs(30),
        }
    }
}

/// Owns the writer task, the subscription task and the event channel.
pub struct SyncReconciler {
    store: Option<Arc<dyn RemoteStore>>,
    tenant_id: String,
    backoff: Backoff,
    outbox: Outbox,
    events_tx: mpsc::UnboundedSender<SyncEvent>,
    writer: JoinHandle<()>,
    cancel: CancellationToken,
}

impl SyncReconciler {
    /// Starts the writer task. With `store = None` the reconciler is inert.
    pub fn start(
        store: Option<Arc<dyn RemoteStore>>,
        tenant_id: impl Into<String>,
        backoff: Backoff,
    ) -> (Self, mpsc::UnboundedReceiver<SyncEvent>) {
        let tenant_id = tenant_id.into();
        let (outbox, writes) = Outbox::channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let writer = tokio::spawn(run_writer(
            store.clone(),
            tenant_id.clone(),
            writes,
            cancel.clone(),
        ));
        let reconciler = SyncReconciler {
            store,
            tenant_id,
            backoff,
            outbox,
            events_tx,
            writer,
            cancel,
        };
        (reconciler, events_rx)
    }

    pub fn outbox(&self) -> Outbox {
        self.outbox.clone()
    }

    pub fn is_online(&self) -> bool {
        self.store.is_some()
    }

    /// Pulls the roster and open-pass snapshots once.
    ///
    /// An empty snapshot is not applied, so a fresh or empty remote never
    /// erases local state.
    pub fn bootstrap(&self) -> JoinHandle<()> {
        let Some(store) = self.store.clone() else {
            tracing::debug!("no remote configured, skipping bootstrap");
            return tokio::spawn(async {});
        };
        let tenant_id = self.tenant_id.clone();
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            match store.fetch_roster(&tenant_id).await {
                Ok(rows) if rows.is_empty() => {
                    tracing::debug!("remote roster empty, keeping local roster");
                }
                Ok(rows) => {
                    tracing::info!(count = rows.len(), "roster bootstrapped");
                    let _ = events.send(SyncEvent::Roster(roster_from_rows(rows)));
                }
                Err(e) => tracing::warn!(error = %e, "RemoteFetchFailure: roster"),
            }
            match store.fetch_active(&tenant_id).await {
                Ok(rows) if rows.is_empty() => {
                    tracing::debug!("remote active set empty, keeping local passes");
                }
                Ok(rows) => {
                    tracing::info!(count = rows.len(), "active passes bootstrapped");
                    let _ = events.send(SyncEvent::Active(passes_from_rows(rows)));
                }
                Err(e) => tracing::warn!(error = %e, "RemoteFetchFailure: active passes"),
            }
        })
    }

    /// Re-pulls the open-pass snapshot; the result replaces the local set
    /// even when empty.
    pub fn refresh(&self) -> JoinHandle<()> {
        let Some(store) = self.store.clone() else {
            return tokio::spawn(async {});
        };
        let tenant_id = self.tenant_id.clone();
        let events = self.events_tx.clone();
        tokio::spawn(async move { refresh_active(store.as_ref(), &tenant_id, &events).await })
    }

    /// Keeps a change subscription alive until shutdown, refreshing on
    /// every notification.
    pub fn spawn_subscription(&self) -> Option<JoinHandle<()>> {
        let store = self.store.clone()?;
        Some(tokio::spawn(run_subscription(
            store,
            self.tenant_id.clone(),
            self.backoff,
            self.events_tx.clone(),
            self.cancel.clone(),
        )))
    }

    /// Stops the subscription and lets the writer attempt every queued
    /// write, waiting at most [`SHUTDOWN_GRACE`].
    pub async fn shutdown(self) {
        self.cancel.cancel();
        drop(self.outbox);
        if tokio::time::timeout(SHUTDOWN_GRACE, self.writer)
            .await
            .is_err()
        {
            tracing::warn!("remote writes still pending at shutdown, abandoning them");
        }
    }
}

fn passes_from_rows(rows: Vec<PassRow>) -> Vec<Pass> {
    rows.into_iter().map(PassRow::into_pass).collect()
}

async fn refresh_active(
    store: &dyn RemoteStore,
    tenant_id: &str,
    events: &mpsc::UnboundedSender<SyncEvent>,
) {
    match store.fetch_active(tenant_id).await {
        Ok(rows) => {
            tracing::debug!(count = rows.len(), "active passes refreshed");
            let _ = events.send(SyncEvent::Active(passes_from_rows(rows)));
        }
        Err(e) => tracing::warn!(error = %e, "RemoteFetchFailure: active passes"),
    }
}

async fn run_writer(
    store: Option<Arc<dyn RemoteStore>>,
    tenant_id: String,
    mut writes: mpsc::UnboundedReceiver<RemoteWrite>,
    cancel: CancellationToken,
) {
    loop {
        let write = tokio::select! {
            biased;
            write = writes.recv() => match write {
                Some(write) => write,
                None => return,
            },
            _ = cancel.cancelled() => break,
        };
        apply_write(store.as_deref(), &tenant_id, write).await;
    }

    // Shutting down: attempt whatever is already queued
    while let Ok(write) = writes.try_recv() {
        apply_write(store.as_deref(), &tenant_id, write).await;
    }
}

async fn apply_write(store: Option<&dyn RemoteStore>, tenant_id: &str, write: RemoteWrite) {
    let label = write.label();
    let Some(store) = store else {
        tracing::debug!(write = label, "offline, dropping remote write");
        return;
    };
    let result = match write {
        RemoteWrite::InsertPass(pass) => store.insert_pass(PassRow::from_pass(&pass, tenant_id)).await,
        RemoteWrite::ClosePass(pass) => match PassClose::from_pass(&pass, tenant_id) {
            Some(close) => store.close_pass(close).await,
            None => {
                tracing::warn!(id = %pass.id, "refusing to mirror close of an open pass");
                return;
            }
        },
        RemoteWrite::UpsertStudent { id, entry } => {
            store
                .upsert_student(StudentRow::from_entry(&id, &entry, tenant_id))
                .await
        }
    };
    match result {
        Ok(()) => tracing::debug!(write = label, "remote write applied"),
        Err(e) => tracing::warn!(write = label, error = %e, "RemoteWriteFailure"),
    }
}

async fn run_subscription(
    store: Arc<dyn RemoteStore>,
    tenant_id: String,
    backoff: Backoff,
    events: mpsc::UnboundedSender<SyncEvent>,
    cancel: CancellationToken,
) {
    let mut delay = backoff.initial;
    let mut resubscribing = false;

    loop {
        let subscribed = tokio::select! {
            _ = cancel.cancelled() => return,
            result = store.subscribe(&tenant_id) => result,
        };

        match subscribed {
            Ok(mut notifications) => {
                tracing::info!(tenant = %tenant_id, "subscribed to remote changes");
                delay = backoff.initial;
                if resubscribing {
                    // Recover anything missed while disconnected
                    refresh_active(store.as_ref(), &tenant_id, &events).await;
                }
                loop {
                    tokio::select! {
                        _ = cancel.cancelled() => return,
                        notification = notifications.recv() => match notification {
                            Some(()) => refresh_active(store.as_ref(), &tenant_id, &events).await,
                            None => break,
                        },
                    }
                }
                tracing::warn!("remote subscription lost, reconnecting");
            }
            Err(e) => {
                tracing::warn!(error = %e, retry_in_ms = delay.as_millis() as u64, "subscribe failed");
            }
        }

        resubscribing = true;
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(delay) => {}
        }
        delay = backoff.next(delay);
    }
}
