// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket server implementation.
//!
//! Handles client connections, request routing, and per-tenant change
//! notification fanout.

use std::collections::HashSet;
use std::net::SocketAddr;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast::error::RecvError;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use hp_core::protocol::{ClientMessage, ServerMessage};

use crate::state::ServerState;

/// Run the WebSocket server on the given address.
pub async fn run(addr: SocketAddr, state: ServerState) -> Result<(), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on: {}", addr);

    loop {
        let (stream, peer_addr) = listener.accept().await?;
        let state = state.clone();

        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer_addr, state).await {
                error!("Connection error from {}: {}", peer_addr, e);
            }
        });
    }
}

/// Handle a single WebSocket connection.
pub(crate) async fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: ServerState,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    info!("New WebSocket connection from: {}", peer_addr);

    let (mut ws_sink, mut ws_stream) = ws_stream.split();

    let mut broadcast_rx = state.subscribe();
    // Tenants this connection asked to hear about.
    let mut subscriptions: HashSet<String> = HashSet::new();

    'conn: loop {
        tokio::select! {
            msg = ws_stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let response = handle_client_message(&text, &state, &mut subscriptions).await;
                        let json = response.to_json()?;
                        ws_sink.send(Message::Text(json.into())).await?;
                    }
                    Some(Ok(Message::Close(_))) => {
                        info!("Client {} disconnected", peer_addr);
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        ws_sink.send(Message::Pong(data)).await?;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        error!("WebSocket error from {}: {}", peer_addr, e);
                        break;
                    }
                    None => {
                        info!("Client {} stream ended", peer_addr);
                        break;
                    }
                }
            }

            broadcast = broadcast_rx.recv() => {
                match broadcast {
                    Ok(ServerMessage::Changed { tenant_id }) => {
                        if !subscriptions.contains(&tenant_id) {
                            continue;
                        }
                        let json = ServerMessage::Changed { tenant_id }.to_json()?;
                        if let Err(e) = ws_sink.send(Message::Text(json.into())).await {
                            warn!("Failed to send notification to {}: {}", peer_addr, e);
                            break;
                        }
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(n)) => {
                        warn!("Client {} lagged by {} notifications", peer_addr, n);
                        for notice in lagged_notices(&subscriptions) {
                            let json = notice.to_json()?;
                            if let Err(e) = ws_sink.send(Message::Text(json.into())).await {
                                warn!("Failed to send notification to {}: {}", peer_addr, e);
                                break 'conn;
                            }
                        }
                    }
                    Err(RecvError::Closed) => {
                        break;
                    }
                }
            }
        }
    }

    info!("Connection closed: {}", peer_addr);
    Ok(())
}

/// Notices owed to a connection that missed broadcasts.
///
/// `changed` carries no payload, so one per subscribed tenant stands in for
/// everything dropped.
pub(crate) fn lagged_notices(subscriptions: &HashSet<String>) -> Vec<ServerMessage> {
    let mut tenants: Vec<&String> = subscriptions.iter().collect();
    tenants.sort();
    tenants
        .into_iter()
        .map(|tenant_id| ServerMessage::Changed {
            tenant_id: tenant_id.clone(),
        })
        .collect()
}

/// Process a client message and return the reply.
///
/// Failures become `error` replies; they never close the connection.
async fn handle_client_message(
    text: &str,
    state: &ServerState,
    subscriptions: &mut HashSet<String>,
) -> ServerMessage {
    let msg = match ClientMessage::from_json(text) {
        Ok(msg) => msg,
        Err(e) => {
            warn!("Unreadable message: {}", e);
            return ServerMessage::error(None, format!("invalid message: {e}"));
        }
    };
    debug!("Received message: {:?}", msg);

    let req = msg.req();
    match apply(msg, state, subscriptions).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!("Request {} failed: {}", req, e);
            ServerMessage::error(Some(req), e.to_string())
        }
    }
}

async fn apply(
    msg: ClientMessage,
    state: &ServerState,
    subscriptions: &mut HashSet<String>,
) -> hp_core::Result<ServerMessage> {
    match msg {
        ClientMessage::FetchActive { req, tenant_id } => {
            let rows = state.active_passes(&tenant_id).await?;
            debug!("Active passes for {}: {}", tenant_id, rows.len());
            Ok(ServerMessage::Passes { req, rows })
        }

        ClientMessage::FetchRoster { req, tenant_id } => {
            let rows = state.students(&tenant_id).await?;
            debug!("Students for {}: {}", tenant_id, rows.len());
            Ok(ServerMessage::Students { req, rows })
        }

        ClientMessage::InsertPass { req, row } => {
            state.insert_pass(row).await?;
            Ok(ServerMessage::Ack { req })
        }

        ClientMessage::ClosePass {
            req,
            tenant_id,
            id,
            end_time,
            over_limit,
            late_reason,
        } => {
            let updated = state
                .close_pass(&tenant_id, &id, &end_time, over_limit, &late_reason)
                .await?;
            if !updated {
                debug!("Close of {} matched no open pass", id);
            }
            Ok(ServerMessage::Ack { req })
        }

        ClientMessage::UpsertStudent { req, row } => {
            state.upsert_student(row).await?;
            Ok(ServerMessage::Ack { req })
        }

        ClientMessage::Subscribe { req, tenant_id } => {
            info!("Subscription to {}", tenant_id);
            subscriptions.insert(tenant_id);
            Ok(ServerMessage::Ack { req })
        }
    }
}
