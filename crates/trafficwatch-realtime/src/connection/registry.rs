//! Registry of every open, authenticated connection keyed by ID.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use trafficwatch_core::error::AppError;

use crate::metrics::RealtimeMetrics;

use super::authenticator::AuthenticatedConnection;
use super::handle::{ConnectionHandle, ConnectionId, ConnectionInfo};

/// Process-local registry of admitted connections.
///
/// Entries are only ever created from an [`AuthenticatedConnection`], so a
/// rejected handshake can never appear here. Each operation touches a single
/// key and is atomic with respect to the others.
#[derive(Debug)]
pub struct ConnectionRegistry {
    /// Connection ID → connection handle.
    entries: DashMap<ConnectionId, Arc<ConnectionHandle>>,
    /// Outbound buffer size for connections opened via [`ConnectionRegistry::register`].
    buffer_size: usize,
    /// Metrics.
    metrics: Arc<RealtimeMetrics>,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    pub fn new(buffer_size: usize, metrics: Arc<RealtimeMetrics>) -> Self {
        Self {
            entries: DashMap::new(),
            buffer_size: buffer_size.max(1),
            metrics,
        }
    }

    /// Admits an authenticated connection under a transport-assigned ID.
    ///
    /// IDs are unique per transport; a duplicate is refused and the existing
    /// entry is left untouched.
    pub fn admit(
        &self,
        id: ConnectionId,
        identity: AuthenticatedConnection,
        sender: mpsc::Sender<String>,
    ) -> Result<Arc<ConnectionHandle>, AppError> {
        let handle = match self.entries.entry(id) {
            Entry::Occupied(_) => {
                warn!(conn_id = %id, "Connection ID already registered");
                return Err(AppError::internal(format!(
                    "Connection {id} is already registered"
                )));
            }
            Entry::Vacant(slot) => {
                let handle = Arc::new(ConnectionHandle::new(id, identity, sender));
                slot.insert(handle.clone());
                handle
            }
        };

        self.metrics.connection_opened();

        info!(
            conn_id = %handle.id,
            subject_id = %handle.subject_id,
            email = %handle.email,
            role = ?handle.role,
            "Client connected"
        );

        Ok(handle)
    }

    /// Assigns a fresh ID and outbound channel, then admits the connection.
    ///
    /// Returns the handle and the receiver the socket writer drains.
    pub fn register(
        &self,
        identity: AuthenticatedConnection,
    ) -> Result<(Arc<ConnectionHandle>, mpsc::Receiver<String>), AppError> {
        let (tx, rx) = mpsc::channel(self.buffer_size);
        let handle = self.admit(Uuid::new_v4(), identity, tx)?;
        Ok((handle, rx))
    }

    /// Removes a connection. Removing an absent ID is a no-op.
    pub fn remove(&self, id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        let (_, handle) = self.entries.remove(id)?;
        handle.close();
        self.metrics.connection_closed();

        info!(
            conn_id = %id,
            subject_id = %handle.subject_id,
            email = %handle.email,
            "Client disconnected"
        );

        Some(handle)
    }

    /// Point-in-time copy of every registered connection.
    ///
    /// Admits and removes that race with the caller's iteration affect the
    /// registry, not the returned vector.
    pub fn snapshot(&self) -> Vec<Arc<ConnectionHandle>> {
        self.entries
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Serializable view of every registered connection.
    pub fn infos(&self) -> Vec<ConnectionInfo> {
        self.snapshot().iter().map(|handle| handle.info()).collect()
    }

    /// Gets a specific connection by ID.
    pub fn get(&self, id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        self.entries.get(id).map(|entry| entry.value().clone())
    }

    /// Whether the ID is registered.
    pub fn contains(&self, id: &ConnectionId) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of registered connections.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no connection is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Closes and removes every connection (process shutdown).
    pub fn close_all(&self) -> usize {
        let ids: Vec<ConnectionId> = self.entries.iter().map(|entry| *entry.key()).collect();
        let closed = ids.iter().filter_map(|id| self.remove(id)).count();
        info!(count = closed, "All connections closed");
        closed
    }
}
