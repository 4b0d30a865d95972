//! Gateway metrics.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Gateway-level counters.
#[derive(Debug, Default)]
pub struct RealtimeMetrics {
    /// Connections admitted since start
    connections_opened: AtomicU64,
    /// Connections removed since start
    connections_closed: AtomicU64,
    /// Handshakes rejected by the credential check
    connections_rejected: AtomicU64,
    /// Detection ticks executed
    ticks: AtomicU64,
    /// Notifications broadcast
    notifications_broadcast: AtomicU64,
    /// Successful per-connection deliveries
    deliveries_succeeded: AtomicU64,
    /// Failed per-connection deliveries
    deliveries_failed: AtomicU64,
    /// Ticks abandoned because the producer failed
    producer_failures: AtomicU64,
}

impl RealtimeMetrics {
    /// Create new zeroed metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an admitted connection
    pub fn connection_opened(&self) {
        self.connections_opened.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a removed connection
    pub fn connection_closed(&self) {
        self.connections_closed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a rejected handshake
    pub fn connection_rejected(&self) {
        self.connections_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a detection tick
    pub fn tick(&self) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one broadcast and its delivery outcome
    pub fn broadcast(&self, delivered: u64, failed: u64) {
        self.notifications_broadcast.fetch_add(1, Ordering::Relaxed);
        self.deliveries_succeeded.fetch_add(delivered, Ordering::Relaxed);
        self.deliveries_failed.fetch_add(failed, Ordering::Relaxed);
    }

    /// Record a producer failure
    pub fn producer_failure(&self) {
        self.producer_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        let opened = self.connections_opened.load(Ordering::Relaxed);
        let closed = self.connections_closed.load(Ordering::Relaxed);
        MetricsSnapshot {
            connections_opened: opened,
            connections_closed: closed,
            connections_active: opened.saturating_sub(closed),
            connections_rejected: self.connections_rejected.load(Ordering::Relaxed),
            ticks: self.ticks.load(Ordering::Relaxed),
            notifications_broadcast: self.notifications_broadcast.load(Ordering::Relaxed),
            deliveries_succeeded: self.deliveries_succeeded.load(Ordering::Relaxed),
            deliveries_failed: self.deliveries_failed.load(Ordering::Relaxed),
            producer_failures: self.producer_failures.load(Ordering::Relaxed),
        }
    }
}

/// Serializable metrics snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    /// Connections admitted since start
    pub connections_opened: u64,
    /// Connections removed since start
    pub connections_closed: u64,
    /// Currently registered connections
    pub connections_active: u64,
    /// Rejected handshakes
    pub connections_rejected: u64,
    /// Detection ticks executed
    pub ticks: u64,
    /// Notifications broadcast
    pub notifications_broadcast: u64,
    /// Successful deliveries
    pub deliveries_succeeded: u64,
    /// Failed deliveries
    pub deliveries_failed: u64,
    /// Producer failures
    pub producer_failures: u64,
}
