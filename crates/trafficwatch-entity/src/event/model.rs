//! Traffic event entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::kind::EventKind;
use super::severity::Severity;
use super::status::EventStatus;

/// Geographic coordinates in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
}

/// Where an event happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Street address.
    pub address: String,
    /// Optional coordinates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

impl Location {
    /// Location known only by address.
    pub fn from_address(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            coordinates: None,
        }
    }

    /// Human-readable descriptor: the address, followed by coordinates when known.
    pub fn descriptor(&self) -> String {
        match self.coordinates {
            Some(c) => format!("{} ({:.5}, {:.5})", self.address, c.lat, c.lng),
            None => self.address.clone(),
        }
    }
}

/// A traffic event as reported by the detection pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedEvent {
    /// Unique event identifier.
    pub id: Uuid,
    /// Event classification.
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// Short title.
    pub title: String,
    /// Longer description.
    pub description: Option<String>,
    /// When the event happened.
    pub event_date: DateTime<Utc>,
    /// Where the event happened.
    pub location: Location,
    /// Handling status.
    pub status: EventStatus,
    /// Severity, when classified.
    pub severity: Option<Severity>,
    /// Camera that observed the event.
    pub camera_id: Option<Uuid>,
    /// Recorded clip, if any.
    pub video_url: Option<String>,
    /// Whether a supervisor confirmed the event.
    pub confirmed: bool,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

impl DetectedEvent {
    /// Creates an unconfirmed, unsolved event observed now.
    pub fn new(kind: EventKind, title: impl Into<String>, location: Location) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            kind,
            title: title.into(),
            description: None,
            event_date: now,
            location,
            status: EventStatus::Unsolved,
            severity: None,
            camera_id: None,
            video_url: None,
            confirmed: false,
            created_at: now,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the severity.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    /// Projection exposed to clients.
    pub fn to_public(&self) -> PublicEvent {
        PublicEvent {
            id: self.id,
            kind: self.kind,
            title: self.title.clone(),
            description: self.description.clone(),
            event_date: self.event_date,
            location: self.location.clone(),
            status: self.status,
            severity: self.severity,
            camera_id: self.camera_id,
        }
    }
}

/// Public projection of a [`DetectedEvent`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicEvent {
    /// Event identifier.
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Event classification.
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// Short title.
    pub title: String,
    /// Longer description.
    pub description: Option<String>,
    /// When the event happened.
    pub event_date: DateTime<Utc>,
    /// Where the event happened.
    pub location: Location,
    /// Handling status.
    pub status: EventStatus,
    /// Severity, when classified.
    pub severity: Option<Severity>,
    /// Camera that observed the event.
    pub camera_id: Option<Uuid>,
}
