//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Roles assigned to municipal staff accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Platform administrator; manages accounts and the detection service.
    Amministratore,
    /// Supervisor who confirms detected events.
    Sorvegliante,
    /// Municipal employee with read access to events and streams.
    DipendenteComunale,
}

impl UserRole {
    /// Return the role as it appears in tokens and API payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Amministratore => "amministratore",
            Self::Sorvegliante => "sorvegliante",
            Self::DipendenteComunale => "dipendentecomunale",
        }
    }

    /// Check if this role is an administrator.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Amministratore)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
