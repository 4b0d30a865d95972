//! Inbound and outbound WebSocket message type definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::notification::Notification;

/// Messages sent by the client to the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    /// Client announces itself after connecting.
    Identify {
        /// Free-form client data.
        #[serde(default)]
        data: Option<serde_json::Value>,
    },
    /// Application-level keepalive.
    Ping,
}

/// Messages sent by the server to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    /// Detected incident.
    Notification(Notification),
    /// Reply to [`InboundMessage::Ping`].
    Pong {
        /// Server timestamp.
        timestamp: DateTime<Utc>,
    },
    /// Error message.
    Error {
        /// Error code.
        code: String,
        /// Error description.
        message: String,
    },
}

impl OutboundMessage {
    /// Serialize for the wire.
    pub fn to_frame(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
