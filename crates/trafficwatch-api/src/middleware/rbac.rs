//! RBAC helpers for role-based route guarding.

use trafficwatch_core::error::AppError;

use crate::extractors::AuthUser;
use crate::state::AppState;

/// Checks that the caller holds the `amministratore` role.
pub fn require_admin(state: &AppState, auth: &AuthUser) -> Result<(), AppError> {
    state.rbac_enforcer.require_admin(auth)
}
