//! RBAC enforcement. Checks whether a token's role is allowed on a route.

use tracing::debug;

use trafficwatch_core::error::AppError;

use crate::jwt::Claims;

/// Enforces role requirements for guarded operations.
#[derive(Debug, Clone, Default)]
pub struct RbacEnforcer;

impl RbacEnforcer {
    /// Creates a new enforcer.
    pub fn new() -> Self {
        Self
    }

    /// Allows administrators only. Tokens without a role are always denied.
    pub fn require_admin(&self, claims: &Claims) -> Result<(), AppError> {
        if claims.role.is_some_and(|role| role.is_admin()) {
            return Ok(());
        }

        debug!(subject_id = %claims.id, role = ?claims.role, "Admin check denied");
        Err(AppError::forbidden("Unauthorized role"))
    }
}
