//! Response DTOs.

use serde::{Deserialize, Serialize};

use trafficwatch_realtime::detection::EmitterStatus;
use trafficwatch_realtime::metrics::MetricsSnapshot;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Open WebSocket connections.
    pub connections: usize,
    /// Emitter status.
    pub detection: EmitterStatus,
    /// Gateway counters.
    pub metrics: MetricsSnapshot,
}
