//! Optional session token extraction from the `token` request header.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

/// Name of the request header carrying the session token.
pub const TOKEN_HEADER: &str = "token";

/// Extracts the optional session token from the `token` header.
///
/// Extraction never fails: a missing, empty, or non-UTF-8 header yields
/// `None`. Whether a token must be present (or absent) is decided per
/// operation by the authorization guard, not by the extractor.
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct TokenHeader(pub Option<String>);

impl TokenHeader {
    /// Returns the token as a borrowed string, if present.
    #[inline]
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S> FromRequestParts<S> for TokenHeader
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_owned);

        Ok(Self(token))
    }
}
