//! Individual WebSocket connection handle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use trafficwatch_core::error::AppError;
use trafficwatch_entity::user::UserRole;

use super::authenticator::AuthenticatedConnection;

/// Unique connection identifier
pub type ConnectionId = Uuid;

/// A handle to a single admitted WebSocket connection.
///
/// Holds the sender for pushing serialized frames to the socket writer,
/// plus the identity claims the connection was admitted with.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID
    pub id: ConnectionId,
    /// Subject identifier from the credential
    pub subject_id: String,
    /// Subject e-mail from the credential
    pub email: String,
    /// Subject role from the credential
    pub role: Option<UserRole>,
    /// When the connection was admitted
    pub connected_at: DateTime<Utc>,
    /// Sender for outbound frames
    sender: mpsc::Sender<String>,
    /// Cancelled once the connection is closed
    closed: CancellationToken,
}

impl ConnectionHandle {
    /// Create a new connection handle
    pub fn new(
        id: ConnectionId,
        identity: AuthenticatedConnection,
        sender: mpsc::Sender<String>,
    ) -> Self {
        Self {
            id,
            subject_id: identity.subject_id,
            email: identity.email,
            role: identity.role,
            connected_at: Utc::now(),
            sender,
            closed: CancellationToken::new(),
        }
    }

    /// Queue a frame for this connection without waiting.
    ///
    /// A closed connection or a full buffer is reported as a delivery failure.
    pub fn send(&self, frame: String) -> Result<(), AppError> {
        if !self.is_alive() {
            return Err(AppError::delivery(format!("Connection {} is closed", self.id)));
        }
        match self.sender.try_send(frame) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => Err(AppError::delivery(format!(
                "Connection {} send buffer full, dropping message",
                self.id
            ))),
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.close();
                Err(AppError::delivery(format!(
                    "Connection {} writer has gone away",
                    self.id
                )))
            }
        }
    }

    /// Check if connection is alive
    pub fn is_alive(&self) -> bool {
        !self.closed.is_cancelled()
    }

    /// Mark the connection closed; the socket tasks observe this and shut down.
    pub fn close(&self) {
        self.closed.cancel();
    }

    /// Resolves once [`ConnectionHandle::close`] has been called.
    pub async fn closed(&self) {
        self.closed.cancelled().await
    }

    /// Get a snapshot of connection info
    pub fn info(&self) -> ConnectionInfo {
        ConnectionInfo {
            id: self.id,
            subject_id: self.subject_id.clone(),
            email: self.email.clone(),
            role: self.role,
            connected_at: self.connected_at,
        }
    }
}

/// Snapshot of connection info (serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionInfo {
    /// Connection ID
    pub id: ConnectionId,
    /// Subject ID
    pub subject_id: String,
    /// Subject e-mail
    pub email: String,
    /// Role
    pub role: Option<UserRole>,
    /// Connected at
    pub connected_at: DateTime<Utc>,
}
