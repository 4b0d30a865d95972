//! Notification payload pushed to connected clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use trafficwatch_core::error::AppError;
use trafficwatch_entity::event::{DetectedEvent, EventKind, Severity};

/// Keys owned by the payload itself; producer details never override them.
const RESERVED_KEYS: [&str; 5] = [
    "type",
    "kind",
    "occurredAt",
    "locationDescriptor",
    "severity",
];

/// An incident notification. Immutable once built.
///
/// Serializes as the four core fields followed by any extra fields the
/// producer attached, flattened into the same object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    kind: EventKind,
    occurred_at: DateTime<Utc>,
    location_descriptor: String,
    severity: Severity,
    #[serde(flatten)]
    details: Map<String, Value>,
}

impl Notification {
    /// Builds a payload without extra details.
    pub fn new(
        kind: EventKind,
        occurred_at: DateTime<Utc>,
        location_descriptor: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            kind,
            occurred_at,
            location_descriptor: location_descriptor.into(),
            severity,
            details: Map::new(),
        }
    }

    /// Attaches a producer-supplied field. Reserved keys are ignored.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if !RESERVED_KEYS.contains(&key.as_str()) {
            self.details.insert(key, value.into());
        }
        self
    }

    /// Classification tag.
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// When the event happened.
    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    /// Where the event happened.
    pub fn location_descriptor(&self) -> &str {
        &self.location_descriptor
    }

    /// Ordinal severity.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Extra producer fields.
    pub fn details(&self) -> &Map<String, Value> {
        &self.details
    }
}

impl TryFrom<&DetectedEvent> for Notification {
    type Error = AppError;

    /// Projects a detected event; its public fields travel as details so
    /// clients can correlate the notification with the stored record.
    fn try_from(event: &DetectedEvent) -> Result<Self, Self::Error> {
        let severity = event
            .severity
            .ok_or_else(|| AppError::producer(format!("Event {} has no severity", event.id)))?;

        let public = match serde_json::to_value(event.to_public())? {
            Value::Object(map) => map,
            other => {
                return Err(AppError::producer(format!(
                    "Unexpected public event shape: {other}"
                )));
            }
        };

        let notification = Notification::new(
            event.kind,
            event.event_date,
            event.location.descriptor(),
            severity,
        );

        Ok(public
            .into_iter()
            .fold(notification, |n, (key, value)| n.with_detail(key, value)))
    }
}
