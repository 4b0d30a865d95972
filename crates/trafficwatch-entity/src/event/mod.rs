//! Traffic event entities.

pub mod kind;
pub mod model;
pub mod severity;
pub mod status;

pub use kind::EventKind;
pub use model::{Coordinates, DetectedEvent, Location, PublicEvent};
pub use severity::Severity;
pub use status::EventStatus;
