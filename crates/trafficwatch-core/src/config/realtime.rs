//! Real-time WebSocket gateway configuration.

use serde::{Deserialize, Serialize};

/// Real-time (WebSocket) gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Per-connection outbound buffer. A full buffer fails the delivery.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
    /// Path the WebSocket upgrade is served on.
    #[serde(default = "default_ws_path")]
    pub ws_path: String,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            channel_buffer_size: default_channel_buffer(),
            ws_path: default_ws_path(),
        }
    }
}

fn default_channel_buffer() -> usize {
    64
}

fn default_ws_path() -> String {
    "/ws".to_string()
}
