// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the transport seam: `WsStore` request correlation over a
//! scripted transport.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use hp_core::protocol::{ClientMessage, ServerMessage};

use super::client::{WsConfig, WsStore};
use super::store::{RemoteStore, StoreError};
use super::transport::{Transport, TransportResult};

type Responder = Arc<dyn Fn(&ClientMessage) -> Vec<ServerMessage> + Send + Sync>;

/// Mock transport that answers each sent message through a responder.
pub struct MockTransport {
    connected: bool,
    connect_should_fail: bool,
    /// Messages that will be returned by recv().
    incoming: VecDeque<ServerMessage>,
    /// Messages that were sent via send(), shared across connections.
    outgoing: Arc<Mutex<Vec<ClientMessage>>>,
    responder: Responder,
}

impl MockTransport {
    pub fn new(outgoing: Arc<Mutex<Vec<ClientMessage>>>, responder: Responder) -> Self {
        MockTransport {
            connected: false,
            connect_should_fail: false,
            incoming: VecDeque::new(),
            outgoing,
            responder,
        }
    }
}

impl Transport for MockTransport {
    fn connect(
        &mut self,
        _url: &str,
    ) -> Pin<Box<dyn Future<Output = TransportResult<()>> + Send + '_>> {
        Box::pin(async move {
            if self.connect_should_fail {
                Err(StoreError::ConnectionFailed("mock failure".into()))
            } else {
                self.connected = true;
                Ok(())
            }
        })
    }

    fn send(
        &mut self,
        msg: ClientMessage,
    ) -> Pin<Box<dyn Future<Output = TransportResult<()>> + Send + '_>> {
        Box::pin(async move {
            if !self.connected {
                return Err(StoreError::ConnectionClosed);
            }
            self.incoming.extend((self.responder)(&msg));
            self.outgoing.lock().unwrap().push(msg);
            Ok(())
        })
    }

    fn recv(
        &mut self,
    ) -> Pin<Box<dyn Future<Output = TransportResult<Option<ServerMessage>>> + Send + '_>> {
        Box::pin(async move {
            match self.incoming.pop_front() {
                Some(msg) => Ok(Some(msg)),
                None => {
                    self.connected = false;
                    Ok(None)
                }
            }
        })
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

fn store_with(responder: Responder) -> (WsStore<MockTransport>, Arc<Mutex<Vec<ClientMessage>>>) {
    let outgoing = Arc::new(Mutex::new(Vec::new()));
    let sent = Arc::clone(&outgoing);
    let config = WsConfig {
        url: "ws://mock".into(),
        request_timeout: Duration::from_secs(1),
    };
    let store = WsStore::with_transport_factory(config, move || {
        MockTransport::new(Arc::clone(&outgoing), Arc::clone(&responder))
    });
    (store, sent)
}

fn ack_everything() -> Responder {
    Arc::new(|msg| vec![ServerMessage::Ack { req: msg.req() }])
}

#[tokio::test]
async fn test_fetch_active_returns_rows() {
    let (store, sent) = store_with(Arc::new(|msg| {
        vec![ServerMessage::Passes {
            req: msg.req(),
            rows: vec![],
        }]
    }));

    let rows = store.fetch_active("T").await.unwrap();
    assert!(rows.is_empty());

    let sent = sent.lock().unwrap();
    assert!(matches!(
        &sent[0],
        ClientMessage::FetchActive { tenant_id, .. } if tenant_id == "T"
    ));
}

#[tokio::test]
async fn test_uncorrelated_replies_are_skipped() {
    let (store, _) = store_with(Arc::new(|msg| {
        vec![
            ServerMessage::Ack { req: 9_999 },
            ServerMessage::Students {
                req: msg.req(),
                rows: vec![],
            },
        ]
    }));
    assert!(store.fetch_roster("T").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_error_reply_is_remote_error() {
    let (store, _) = store_with(Arc::new(|msg| {
        vec![ServerMessage::error(Some(msg.req()), "UNIQUE constraint failed")]
    }));
    let err = store.fetch_active("T").await.unwrap_err();
    assert!(matches!(err, StoreError::Remote(m) if m.contains("UNIQUE")));
}

#[tokio::test]
async fn test_wrong_reply_kind_is_unexpected() {
    let (store, _) = store_with(ack_everything());
    let err = store.fetch_active("T").await.unwrap_err();
    assert!(matches!(err, StoreError::UnexpectedReply(_)));
}

#[tokio::test]
async fn test_requests_use_increasing_req_ids() {
    let (store, sent) = store_with(ack_everything());
    let row = hp_core::StudentRow {
        student_id: "12345".into(),
        name: "Ana Diaz".into(),
        period: Some("2".into()),
        tenant_id: "T".into(),
    };
    store.upsert_student(row.clone()).await.unwrap();
    store.upsert_student(row).await.unwrap();

    let reqs: Vec<u64> = sent.lock().unwrap().iter().map(ClientMessage::req).collect();
    assert_eq!(reqs.len(), 2);
    assert!(reqs[1] > reqs[0]);
}

#[tokio::test]
async fn test_connection_closed_without_reply() {
    let (store, _) = store_with(Arc::new(|_| vec![]));
    let err = store.fetch_active("T").await.unwrap_err();
    assert!(matches!(err, StoreError::ConnectionClosed));

    // The next request reconnects with a fresh transport
    let err = store.fetch_active("T").await.unwrap_err();
    assert!(matches!(err, StoreError::ConnectionClosed));
}

#[tokio::test]
async fn test_subscription_forwards_changes_then_closes() {
    let (store, sent) = store_with(Arc::new(|msg| match msg {
        ClientMessage::Subscribe { req, tenant_id } => vec![
            ServerMessage::Ack { req: *req },
            ServerMessage::Changed {
                tenant_id: "OTHER".into(),
            },
            ServerMessage::Changed {
                tenant_id: tenant_id.clone(),
            },
        ],
        _ => vec![],
    }));

    let mut rx = store.subscribe("T").await.unwrap();
    assert_eq!(rx.recv().await, Some(()));
    assert_eq!(rx.recv().await, None);
    assert!(matches!(
        sent.lock().unwrap()[0],
        ClientMessage::Subscribe { .. }
    ));
}

#[tokio::test]
async fn test_subscribe_rejected() {
    let (store, _) = store_with(Arc::new(|msg| {
        vec![ServerMessage::error(Some(msg.req()), "no")]
    }));
    assert!(matches!(
        store.subscribe("T").await,
        Err(StoreError::Remote(_))
    ));
}
