//! Stand-in detector that fabricates incidents until a real pipeline exists.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::debug;

use trafficwatch_core::config::DetectionConfig;
use trafficwatch_core::error::AppError;
use trafficwatch_entity::event::{DetectedEvent, EventKind, Location, Severity};

use super::producer::NotificationProducer;
use crate::notification::Notification;

/// Emits a random accident after a simulated processing delay.
#[derive(Debug, Clone)]
pub struct SyntheticDetector {
    latency: Duration,
    emit_probability: f64,
    addresses: Vec<String>,
}

impl SyntheticDetector {
    /// Creates a detector from the detection settings.
    pub fn new(config: &DetectionConfig) -> Self {
        Self {
            latency: Duration::from_millis(config.simulated_latency_ms),
            emit_probability: config.emit_probability.clamp(0.0, 1.0),
            addresses: config.addresses.clone(),
        }
    }

    /// Rolls the dice for one tick.
    fn roll(&self) -> Result<Option<DetectedEvent>, AppError> {
        let mut rng = rand::rng();

        if !rng.random_bool(self.emit_probability) {
            return Ok(None);
        }

        let address = self
            .addresses
            .choose(&mut rng)
            .ok_or_else(|| AppError::producer("No addresses configured for synthetic detection"))?;
        let severity = *Severity::ALL
            .choose(&mut rng)
            .ok_or_else(|| AppError::producer("No severities to choose from"))?;

        let event = DetectedEvent::new(
            EventKind::Incidente,
            "Detected incident",
            Location::from_address(address.clone()),
        )
        .with_description("Incident reported by the automatic detection service.")
        .with_severity(severity);

        Ok(Some(event))
    }
}

#[async_trait]
impl NotificationProducer for SyntheticDetector {
    fn name(&self) -> &str {
        "synthetic"
    }

    async fn produce(&self) -> Result<Option<Notification>, AppError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let Some(event) = self.roll()? else {
            debug!("Synthetic detector found nothing this tick");
            return Ok(None);
        };

        Notification::try_from(&event).map(Some)
    }
}
