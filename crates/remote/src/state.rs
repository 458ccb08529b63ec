// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Server state management.
//!
//! Wraps the canonical database and the change-notification channel.

use chrono::{DateTime, Utc};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};

use hp_core::protocol::ServerMessage;
use hp_core::{Database, PassRow, Result, StudentRow};

const DB_FILE_NAME: &str = "passes.db";

/// Shared server state containing the canonical database.
#[derive(Clone)]
pub struct ServerState {
    inner: Arc<ServerStateInner>,
}

struct ServerStateInner {
    /// The canonical database (protected by mutex for writes).
    db: Mutex<Database>,
    /// Broadcast channel for `changed` notifications, filtered per connection.
    broadcast_tx: broadcast::Sender<ServerMessage>,
}

impl ServerState {
    /// Creates a new server state with the database in the given directory.
    pub fn new(data_dir: &Path) -> Result<Self> {
        let db = Database::open(&data_dir.join(DB_FILE_NAME))?;
        let (broadcast_tx, _) = broadcast::channel(1024);

        Ok(ServerState {
            inner: Arc::new(ServerStateInner {
                db: Mutex::new(db),
                broadcast_tx,
            }),
        })
    }

    /// Inserts a pass and notifies the tenant.
    pub async fn insert_pass(&self, row: PassRow) -> Result<()> {
        {
            let db = self.inner.db.lock().await;
            db.insert_pass(&row)?;
        }
        self.notify(&row.tenant_id);
        Ok(())
    }

    /// Closes a pass. Notifies the tenant only if an open row was updated.
    ///
    /// Returns whether a row was updated.
    pub async fn close_pass(
        &self,
        tenant_id: &str,
        id: &str,
        end_time: &DateTime<Utc>,
        over_limit: bool,
        late_reason: &str,
    ) -> Result<bool> {
        let updated = {
            let db = self.inner.db.lock().await;
            db.close_pass(tenant_id, id, end_time, over_limit, late_reason)?
        };
        if updated > 0 {
            self.notify(tenant_id);
        }
        Ok(updated > 0)
    }

    /// Returns all open passes for a tenant, newest first.
    pub async fn active_passes(&self, tenant_id: &str) -> Result<Vec<PassRow>> {
        let db = self.inner.db.lock().await;
        db.active_passes(tenant_id)
    }

    /// Inserts or updates a student. Does not notify.
    pub async fn upsert_student(&self, row: StudentRow) -> Result<()> {
        let db = self.inner.db.lock().await;
        db.upsert_student(&row)
    }

    /// Returns the roster for a tenant.
    pub async fn students(&self, tenant_id: &str) -> Result<Vec<StudentRow>> {
        let db = self.inner.db.lock().await;
        db.students(tenant_id)
    }

    /// Subscribe to change notifications for all tenants.
    pub fn subscribe(&self) -> broadcast::Receiver<ServerMessage> {
        self.inner.broadcast_tx.subscribe()
    }

    fn notify(&self, tenant_id: &str) {
        // No receivers is fine: nobody is subscribed yet.
        let _ = self.inner.broadcast_tx.send(ServerMessage::Changed {
            tenant_id: tenant_id.to_string(),
        });
    }
}
