//! Ordinal event severity.

use serde::{Deserialize, Serialize};

/// Severity of a traffic event, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Low.
    Bassa,
    /// Medium.
    Media,
    /// High.
    Alta,
}

impl Severity {
    /// All severities in ascending order.
    pub const ALL: [Severity; 3] = [Severity::Bassa, Severity::Media, Severity::Alta];

    /// Return the severity as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bassa => "bassa",
            Self::Media => "media",
            Self::Alta => "alta",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
