//! Locates the bearer credential in a request or WebSocket handshake.
//!
//! Sources are checked in order: the `Authorization` header (with or
//! without a `Bearer ` prefix), the `x-access-token` header, then the
//! `token` query parameter. Empty values count as absent.

/// Header carrying an alternate raw token.
pub const ACCESS_TOKEN_HEADER: &str = "x-access-token";

/// Credential sources gathered by the transport layer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokenSources<'a> {
    /// Value of the `Authorization` header.
    pub authorization: Option<&'a str>,
    /// Value of the `x-access-token` header.
    pub access_token_header: Option<&'a str>,
    /// Decoded `token` query parameter, for browsers that cannot set handshake headers.
    pub query_token: Option<&'a str>,
}

impl<'a> TokenSources<'a> {
    /// Picks the first non-blank token; a blank source falls through to the next one.
    pub fn extract(&self) -> Option<&'a str> {
        let bearer = self
            .authorization
            .map(|header| header.strip_prefix("Bearer ").unwrap_or(header));

        [bearer, self.access_token_header, self.query_token]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|token| !token.is_empty())
    }
}
