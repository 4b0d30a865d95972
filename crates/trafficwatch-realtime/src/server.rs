//! Top-level real-time engine that ties together all subsystems.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};

use trafficwatch_auth::jwt::JwtDecoder;
use trafficwatch_core::config::{DetectionConfig, RealtimeConfig};
use trafficwatch_core::error::AppError;

use crate::connection::authenticator::{AuthenticatedConnection, WsAuthenticator};
use crate::connection::handle::ConnectionHandle;
use crate::connection::registry::ConnectionRegistry;
use crate::detection::emitter::BroadcastEmitter;
use crate::detection::producer::NotificationProducer;
use crate::message::types::{InboundMessage, OutboundMessage};
use crate::metrics::RealtimeMetrics;

/// Central real-time engine: credential gate, registry and emitter.
#[derive(Clone)]
pub struct RealtimeEngine {
    /// Open, authenticated connections.
    pub registry: Arc<ConnectionRegistry>,
    /// Periodic detection broadcast.
    pub emitter: Arc<BroadcastEmitter>,
    /// Metrics collector.
    pub metrics: Arc<RealtimeMetrics>,
    /// Handshake credential check.
    authenticator: WsAuthenticator,
    /// Whether the emitter starts with the engine.
    detection_enabled: bool,
}

impl std::fmt::Debug for RealtimeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeEngine")
            .field("connections", &self.registry.len())
            .field("detection_enabled", &self.detection_enabled)
            .finish()
    }
}

impl RealtimeEngine {
    /// Creates a new engine. Nothing is scheduled until [`RealtimeEngine::start`].
    pub fn new(
        realtime: &RealtimeConfig,
        detection: &DetectionConfig,
        decoder: Arc<JwtDecoder>,
        producer: Arc<dyn NotificationProducer>,
    ) -> Self {
        let metrics = Arc::new(RealtimeMetrics::new());
        let registry = Arc::new(ConnectionRegistry::new(
            realtime.channel_buffer_size,
            metrics.clone(),
        ));
        let emitter = Arc::new(BroadcastEmitter::new(
            registry.clone(),
            producer,
            metrics.clone(),
            Duration::from_secs(detection.interval_seconds),
        ));

        info!(
            buffer = realtime.channel_buffer_size,
            interval_seconds = detection.interval_seconds,
            "Real-time engine initialized"
        );

        Self {
            registry,
            emitter,
            metrics,
            authenticator: WsAuthenticator::new(decoder),
            detection_enabled: detection.enabled,
        }
    }

    /// Starts the detection schedule when enabled.
    pub async fn start(&self) {
        if self.detection_enabled {
            self.emitter.start().await;
        } else {
            info!("Detection disabled, emitter not started");
        }
    }

    /// Checks a handshake credential, counting rejections.
    pub fn authenticate(&self, token: Option<&str>) -> Result<AuthenticatedConnection, AppError> {
        self.authenticator.authenticate(token).inspect_err(|e| {
            self.metrics.connection_rejected();
            warn!(code = e.kind.code(), "WebSocket handshake rejected");
        })
    }

    /// Handles a text frame received from a client.
    ///
    /// Replies are queued on the connection's own outbound channel.
    pub fn handle_inbound(&self, conn: &ConnectionHandle, raw: &str) -> Result<(), AppError> {
        let reply = match serde_json::from_str::<InboundMessage>(raw) {
            Ok(InboundMessage::Identify { data }) => {
                info!(
                    conn_id = %conn.id,
                    subject_id = %conn.subject_id,
                    data = ?data,
                    "Client identified"
                );
                return Ok(());
            }
            Ok(InboundMessage::Ping) => OutboundMessage::Pong {
                timestamp: Utc::now(),
            },
            Err(e) => {
                debug!(conn_id = %conn.id, error = %e, "Unrecognized client message");
                OutboundMessage::Error {
                    code: "INVALID_MESSAGE".to_string(),
                    message: format!("Invalid message: {e}"),
                }
            }
        };

        conn.send(reply.to_frame()?)
    }

    /// Stops the emitter and closes every connection.
    pub async fn shutdown(&self) -> Result<(), AppError> {
        info!("Shutting down real-time engine");

        self.emitter.stop().await;
        let closed = self.registry.close_all();

        info!(closed, "Real-time engine shut down");
        Ok(())
    }
}
