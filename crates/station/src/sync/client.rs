// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket client for the `hp-remote` store.
//!
//! Requests share one lazily opened connection and are correlated with
//! their replies by `req`. Each subscription gets a connection of its own,
//! owned by a forwarding task that turns `changed` frames into channel
//! sends and closes the channel when the connection goes away.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use hp_core::protocol::{ClientMessage, ServerMessage};
use hp_core::{PassRow, StudentRow};
use tokio::sync::{mpsc, Mutex};

use super::store::{PassClose, RemoteStore, StoreError, StoreFuture, StoreResult};
use super::transport::{Transport, WebSocketTransport};
use crate::config::RemoteConfig;

const NOTIFY_BUFFER: usize = 16;

/// Connection settings for [`WsStore`].
#[derive(Debug, Clone)]
pub struct WsConfig {
    pub url: String,
    pub request_timeout: Duration,
}

impl From<&RemoteConfig> for WsConfig {
    fn from(remote: &RemoteConfig) -> Self {
        WsConfig {
            url: remote.url.clone(),
            request_timeout: Duration::from_millis(remote.request_timeout_ms),
        }
    }
}

type TransportFactory<T> = Box<dyn Fn() -> T + Send + Sync>;

/// [`RemoteStore`] over a WebSocket [`Transport`].
pub struct WsStore<T: Transport = WebSocketTransport> {
    config: WsConfig,
    conn: Mutex<Option<T>>,
    next_req: AtomicU64,
    factory: TransportFactory<T>,
}

impl WsStore<WebSocketTransport> {
    pub fn new(config: WsConfig) -> Self {
        Self::with_transport_factory(config, WebSocketTransport::new)
    }
}

impl<T: Transport + 'static> WsStore<T> {
    /// Creates a store whose connections come from `factory` (for testing).
    pub fn with_transport_factory<F>(config: WsConfig, factory: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        WsStore {
            config,
            conn: Mutex::new(None),
            next_req: AtomicU64::new(1),
            factory: Box::new(factory),
        }
    }

    fn next_req(&self) -> u64 {
        self.next_req.fetch_add(1, Ordering::Relaxed)
    }

    async fn connect_new(&self) -> StoreResult<T> {
        let mut transport = (self.factory)();
        transport.connect(&self.config.url).await?;
        Ok(transport)
    }

    /// Sends one request and waits for the reply carrying its `req`.
    ///
    /// Any failure drops the shared connection so the next request
    /// reconnects.
    async fn request(&self, build: impl FnOnce(u64) -> ClientMessage) -> StoreResult<ServerMessage> {
        let req = self.next_req();
        let msg = build(req);
        let mut guard = self.conn.lock().await;

        if !guard.as_ref().is_some_and(|t| t.is_connected()) {
            *guard = Some(self.connect_new().await?);
        }
        let transport = guard.as_mut().ok_or(StoreError::ConnectionClosed)?;

        let exchange = async {
            transport.send(msg).await?;
            loop {
                match transport.recv().await? {
                    Some(reply) if reply.req() == Some(req) => return Ok(reply),
                    Some(ServerMessage::Error { req: None, message }) => {
                        return Err(StoreError::Remote(message));
                    }
                    Some(other) => {
                        tracing::debug!(?other, req, "skipping uncorrelated reply");
                    }
                    None => return Err(StoreError::ConnectionClosed),
                }
            }
        };

        let result = match tokio::time::timeout(self.config.request_timeout, exchange).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout),
        };
        if result.is_err() {
            *guard = None;
        }
        match result? {
            ServerMessage::Error { message, .. } => Err(StoreError::Remote(message)),
            reply => Ok(reply),
        }
    }

    async fn expect_ack(&self, build: impl FnOnce(u64) -> ClientMessage) -> StoreResult<()> {
        match self.request(build).await? {
            ServerMessage::Ack { .. } => Ok(()),
            other => Err(StoreError::UnexpectedReply(format!("{other:?}"))),
        }
    }

    async fn open_subscription(&self, tenant_id: String) -> StoreResult<mpsc::Receiver<()>> {
        let mut transport = self.connect_new().await?;
        let req = self.next_req();
        let handshake = async {
            transport
                .send(ClientMessage::Subscribe {
                    req,
                    tenant_id: tenant_id.clone(),
                })
                .await?;
            match transport.recv().await? {
                Some(ServerMessage::Ack { req: r }) if r == req => Ok(()),
                Some(ServerMessage::Error { message, .. }) => Err(StoreError::Remote(message)),
                Some(other) => Err(StoreError::UnexpectedReply(format!("{other:?}"))),
                None => Err(StoreError::ConnectionClosed),
            }
        };
        match tokio::time::timeout(self.config.request_timeout, handshake).await {
            Ok(result) => result?,
            Err(_) => return Err(StoreError::Timeout),
        }

        let (tx, rx) = mpsc::channel(NOTIFY_BUFFER);
        tokio::spawn(forward_notifications(transport, tenant_id, tx));
        Ok(rx)
    }
}

/// Forwards `changed` frames for `tenant_id` until the connection or the
/// receiver goes away.
async fn forward_notifications<T: Transport>(
    mut transport: T,
    tenant_id: String,
    tx: mpsc::Sender<()>,
) {
    loop {
        match transport.recv().await {
            Ok(Some(ServerMessage::Changed { tenant_id: t })) if t == tenant_id => {
                // A full buffer already guarantees a refresh
                if let Err(mpsc::error::TrySendError::Closed(())) = tx.try_send(()) {
                    return;
                }
            }
            Ok(Some(other)) => tracing::debug!(?other, "ignoring frame on subscription"),
            Ok(None) => {
                tracing::debug!("subscription connection closed");
                return;
            }
            Err(e) => {
                tracing::debug!(error = %e, "subscription connection failed");
                return;
            }
        }
    }
}

impl<T: Transport + 'static> RemoteStore for WsStore<T> {
    fn fetch_active(&self, tenant_id: &str) -> StoreFuture<'_, Vec<PassRow>> {
        let tenant_id = tenant_id.to_string();
        Box::pin(async move {
            match self
                .request(|req| ClientMessage::FetchActive { req, tenant_id })
                .await?
            {
                ServerMessage::Passes { rows, .. } => Ok(rows),
                other => Err(StoreError::UnexpectedReply(format!("{other:?}"))),
            }
        })
    }

    fn fetch_roster(&self, tenant_id: &str) -> StoreFuture<'_, Vec<StudentRow>> {
        let tenant_id = tenant_id.to_string();
        Box::pin(async move {
            match self
                .request(|req| ClientMessage::FetchRoster { req, tenant_id })
                .await?
            {
                ServerMessage::Students { rows, .. } => Ok(rows),
                other => Err(StoreError::UnexpectedReply(format!("{other:?}"))),
            }
        })
    }

    fn insert_pass(&self, row: PassRow) -> StoreFuture<'_, ()> {
        Box::pin(self.expect_ack(|req| ClientMessage::InsertPass { req, row }))
    }

    fn close_pass(&self, close: PassClose) -> StoreFuture<'_, ()> {
        Box::pin(self.expect_ack(move |req| ClientMessage::ClosePass {
            req,
            tenant_id: close.tenant_id,
            id: close.id,
            end_time: close.end_time,
            over_limit: close.over_limit,
            late_reason: close.late_reason,
        }))
    }

    fn upsert_student(&self, row: StudentRow) -> StoreFuture<'_, ()> {
        Box::pin(self.expect_ack(|req| ClientMessage::UpsertStudent { req, row }))
    }

    fn subscribe(&self, tenant_id: &str) -> StoreFuture<'_, mpsc::Receiver<()>> {
        Box::pin(self.open_subscription(tenant_id.to_string()))
    }
}
