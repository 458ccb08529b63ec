// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote sync for the station.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐ Outbox ┌──────────────┐     ┌─────────────┐     ┌───────────┐
//! │   Station   │───────►│    Sync      │────►│ RemoteStore │────►│ hp-remote │
//! │ (control    │        │  Reconciler  │     │  (WsStore)  │◄────│  server   │
//! │   loop)     │◄───────│              │◄────│             │     └───────────┘
//! └─────────────┘ events └──────────────┘     └─────────────┘
//! ```
//!
//! - Optimistic local writes mirrored by a single writer task
//! - Bootstrap and push-driven full refresh of the active set
//! - Subscription kept alive with capped exponential backoff
//! - Injectable store and transport traits for testing

mod client;
mod reconciler;
mod store;
mod transport;

pub use client::{WsConfig, WsStore};
pub use reconciler::{Backoff, Outbox, RemoteWrite, SyncEvent, SyncReconciler};
pub use store::{PassClose, RemoteStore, StoreError, StoreFuture, StoreResult};
pub use transport::{Transport, WebSocketTransport};

#[cfg(test)]
pub(crate) mod test_helpers;



#[cfg(test)]
mod transport_tests;
