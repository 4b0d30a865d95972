//! WebSocket authentication. Validates the handshake credential before admission.

use std::sync::Arc;

use trafficwatch_auth::jwt::JwtDecoder;
use trafficwatch_core::error::AppError;
use trafficwatch_entity::user::UserRole;

/// Identity extracted from a verified credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedConnection {
    /// Subject identifier.
    pub subject_id: String,
    /// Subject e-mail.
    pub email: String,
    /// Subject role, when the token carries one.
    pub role: Option<UserRole>,
}

/// Authenticates WebSocket connections using JWT tokens.
///
/// Pure check: never touches the connection registry, so a rejected
/// handshake leaves no trace.
#[derive(Clone)]
pub struct WsAuthenticator {
    /// JWT decoder.
    decoder: Arc<JwtDecoder>,
}

impl std::fmt::Debug for WsAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WsAuthenticator").finish()
    }
}

impl WsAuthenticator {
    /// Creates a new WebSocket authenticator.
    pub fn new(decoder: Arc<JwtDecoder>) -> Self {
        Self { decoder }
    }

    /// Verifies the handshake token.
    ///
    /// `None` or an empty token yields `CredentialRequired`; a token that
    /// fails verification yields `CredentialInvalid`.
    pub fn authenticate(&self, token: Option<&str>) -> Result<AuthenticatedConnection, AppError> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or_else(AppError::credential_required)?;

        let claims = self.decoder.decode(token)?;

        Ok(AuthenticatedConnection {
            subject_id: claims.id,
            email: claims.email,
            role: claims.role,
        })
    }
}
