// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The remote store as the reconciler sees it.
//!
//! Implemented over WebSocket by [`WsStore`](super::WsStore) and in memory
//! by the test mock.

use std::future::Future;
use std::pin::Pin;

use chrono::{DateTime, Utc};
use hp_core::{Pass, PassRow, StudentRow};
use tokio::sync::mpsc;

/// Error type for remote store operations.
///
/// Never surfaced to the user: the reconciler logs and drops it.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("connection closed")]
    ConnectionClosed,

    #[error("request timed out")]
    Timeout,

    #[error("remote error: {0}")]
    Remote(String),

    #[error("unexpected reply: {0}")]
    UnexpectedReply(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result type for remote store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Boxed future returned by [`RemoteStore`] methods.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = StoreResult<T>> + Send + 'a>>;

/// The close of one pass, as written remotely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassClose {
    pub tenant_id: String,
    pub id: String,
    pub end_time: DateTime<Utc>,
    pub over_limit: bool,
    pub late_reason: String,
}

impl PassClose {
    /// Builds the close record for an ended pass.
    ///
    /// Returns `None` if the pass is still open.
    pub fn from_pass(pass: &Pass, tenant_id: &str) -> Option<Self> {
        Some(PassClose {
            tenant_id: tenant_id.to_string(),
            id: pass.id.clone(),
            end_time: pass.end_time?,
            over_limit: pass.over_limit,
            late_reason: pass.late_reason.clone(),
        })
    }
}

/// Tenant-scoped remote store with change notifications.
pub trait RemoteStore: Send + Sync {
    /// All open passes for the tenant, newest start first.
    fn fetch_active(&self, tenant_id: &str) -> StoreFuture<'_, Vec<PassRow>>;

    /// The full roster for the tenant.
    fn fetch_roster(&self, tenant_id: &str) -> StoreFuture<'_, Vec<StudentRow>>;

    fn insert_pass(&self, row: PassRow) -> StoreFuture<'_, ()>;

    fn close_pass(&self, close: PassClose) -> StoreFuture<'_, ()>;

    /// Idempotent on `(student_id, tenant_id)`.
    fn upsert_student(&self, row: StudentRow) -> StoreFuture<'_, ()>;

    /// Subscribes to change notifications for the tenant.
    ///
    /// The receiver yields one `()` per notification and closes when the
    /// subscription is lost.
    fn subscribe(&self, tenant_id: &str) -> StoreFuture<'_, mpsc::Receiver<()>>;
}
