// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transport abstraction for the remote store connection.
//!
//! [`WsStore`](super::WsStore) speaks the JSON protocol through this trait so
//! its request/reply correlation can be tested without sockets.

use std::future::Future;
use std::pin::Pin;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use hp_core::protocol::{ClientMessage, ServerMessage};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use super::store::StoreError;

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, StoreError>;

type TransportFuture<'a, T> = Pin<Box<dyn Future<Output = TransportResult<T>> + Send + 'a>>;

/// A message-oriented connection to the remote store.
pub trait Transport: Send + Sync {
    /// Connect to a remote server.
    fn connect(&mut self, url: &str) -> TransportFuture<'_, ()>;

    /// Send a message to the server.
    fn send(&mut self, msg: ClientMessage) -> TransportFuture<'_, ()>;

    /// Receive a message from the server.
    ///
    /// Returns `None` if the connection is closed.
    fn recv(&mut self) -> TransportFuture<'_, Option<ServerMessage>>;

    /// Check if connected.
    fn is_connected(&self) -> bool;
}

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// WebSocket transport implementation using tokio-tungstenite.
#[derive(Default)]
pub struct WebSocketTransport {
    sink: Option<SplitSink<WsStream, Message>>,
    stream: Option<SplitStream<WsStream>>,
}

impl WebSocketTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn drop_connection(&mut self) {
        self.sink = None;
        self.stream = None;
    }
}

impl Transport for WebSocketTransport {
    fn connect(&mut self, url: &str) -> TransportFuture<'_, ()> {
        let url = url.to_string();
        Box::pin(async move {
            let (ws, _) = tokio_tungstenite::connect_async(&url)
                .await
                .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;
            let (sink, stream) = ws.split();
            self.sink = Some(sink);
            self.stream = Some(stream);
            Ok(())
        })
    }

    fn send(&mut self, msg: ClientMessage) -> TransportFuture<'_, ()> {
        Box::pin(async move {
            let json = msg
                .to_json()
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            let sink = self.sink.as_mut().ok_or(StoreError::ConnectionClosed)?;

            // Flush as part of the send so a dead socket is noticed here
            if let Err(e) = sink.send(Message::Text(json.into())).await {
                self.drop_connection();
                return Err(StoreError::ConnectionFailed(e.to_string()));
            }
            Ok(())
        })
    }

    fn recv(&mut self) -> TransportFuture<'_, Option<ServerMessage>> {
        Box::pin(async move {
            let stream = self.stream.as_mut().ok_or(StoreError::ConnectionClosed)?;
            loop {
                match stream.next().await {
                    Some(Ok(Message::Text(text))) => {
                        let msg = ServerMessage::from_json(&text)
                            .map_err(|e| StoreError::Serialization(e.to_string()))?;
                        return Ok(Some(msg));
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        self.drop_connection();
                        return Ok(None);
                    }
                    // Ping/pong and binary frames carry nothing for us
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        self.drop_connection();
                        return Err(StoreError::ConnectionFailed(e.to_string()));
                    }
                }
            }
        })
    }

    fn is_connected(&self) -> bool {
        self.sink.is_some()
    }
}
