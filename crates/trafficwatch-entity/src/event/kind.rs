//! Event classification.

use serde::{Deserialize, Serialize};

/// What the detection pipeline observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// Road accident.
    Incidente,
    /// Traffic jam.
    Ingorgo,
}

impl EventKind {
    /// Return the kind as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Incidente => "incidente",
            Self::Ingorgo => "ingorgo",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
