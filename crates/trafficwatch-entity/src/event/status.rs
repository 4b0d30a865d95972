//! Event lifecycle status.

use serde::{Deserialize, Serialize};

/// Handling status of a traffic event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    /// Awaiting review.
    Pending,
    /// Resolved on site.
    Solved,
    /// Confirmed and still open.
    Unsolved,
    /// Dismissed by a supervisor.
    FalseAlarm,
}
