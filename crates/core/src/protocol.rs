// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket protocol messages between stations and the remote store.
//!
//! Every client request carries a `req` correlation id that the server echoes
//! in its reply. The only unsolicited message is [`ServerMessage::Changed`],
//! sent to connections subscribed to the affected tenant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pass::PassRow;
use crate::roster::StudentRow;

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Request all open passes for a tenant, newest start first.
    FetchActive { req: u64, tenant_id: String },

    /// Request the full roster for a tenant.
    FetchRoster { req: u64, tenant_id: String },

    /// Insert a newly opened pass.
    InsertPass { req: u64, row: PassRow },

    /// Close an open pass.
    ClosePass {
        req: u64,
        tenant_id: String,
        id: String,
        end_time: DateTime<Utc>,
        over_limit: bool,
        late_reason: String,
    },

    /// Insert or update a roster entry, keyed by `(student_id, tenant_id)`.
    UpsertStudent { req: u64, row: StudentRow },

    /// Subscribe this connection to change notifications for a tenant.
    Subscribe { req: u64, tenant_id: String },
}

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Reply to `fetch_active`.
    Passes { req: u64, rows: Vec<PassRow> },

    /// Reply to `fetch_roster`.
    Students { req: u64, rows: Vec<StudentRow> },

    /// Successful reply to a write or subscribe.
    Ack { req: u64 },

    /// Error message.
    Error {
        /// Correlation id of the failed request, when it could be read.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        req: Option<u64>,
        /// Human-readable error description.
        message: String,
    },

    /// Passes for this tenant changed; re-fetch to see how.
    Changed { tenant_id: String },
}

impl ClientMessage {
    /// Returns the correlation id.
    pub fn req(&self) -> u64 {
        match self {
            ClientMessage::FetchActive { req, .. }
            | ClientMessage::FetchRoster { req, .. }
            | ClientMessage::InsertPass { req, .. }
            | ClientMessage::ClosePass { req, .. }
            | ClientMessage::UpsertStudent { req, .. }
            | ClientMessage::Subscribe { req, .. } => *req,
        }
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl ServerMessage {
    /// Creates an Error message.
    pub fn error(req: Option<u64>, message: impl Into<String>) -> Self {
        ServerMessage::Error {
            req,
            message: message.into(),
        }
    }

    /// Returns the correlation id, if this is a reply.
    pub fn req(&self) -> Option<u64> {
        match self {
            ServerMessage::Passes { req, .. }
            | ServerMessage::Students { req, .. }
            | ServerMessage::Ack { req } => Some(*req),
            ServerMessage::Error { req, .. } => *req,
            ServerMessage::Changed { .. } => None,
        }
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
