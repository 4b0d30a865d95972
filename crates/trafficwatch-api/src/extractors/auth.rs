//! `AuthUser` extractor: verifies the bearer credential and injects its claims.

use axum::extract::{FromRequestParts, Query};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use serde::Deserialize;

use trafficwatch_auth::jwt::Claims;
use trafficwatch_auth::token::{ACCESS_TOKEN_HEADER, TokenSources};
use trafficwatch_core::error::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// Verified claims of the caller.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl std::ops::Deref for AuthUser {
    type Target = Claims;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Query parameters that may carry the credential.
#[derive(Debug, Default, Deserialize)]
pub struct TokenQuery {
    /// JWT access token.
    pub token: Option<String>,
}

/// Finds the credential in the `Authorization` header, the
/// `x-access-token` header, or the `token` query parameter.
pub fn request_token<'a>(headers: &'a HeaderMap, query: &'a TokenQuery) -> Option<&'a str> {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

    TokenSources {
        authorization: header(AUTHORIZATION.as_str()),
        access_token_header: header(ACCESS_TOKEN_HEADER),
        query_token: query.token.as_deref(),
    }
    .extract()
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // An unparseable query string simply carries no token.
        let query = Query::<TokenQuery>::try_from_uri(&parts.uri)
            .map(|Query(query)| query)
            .unwrap_or_default();
        let token =
            request_token(&parts.headers, &query).ok_or_else(AppError::credential_required)?;

        let claims = state.jwt_decoder.decode(token)?;

        Ok(AuthUser(claims))
    }
}
