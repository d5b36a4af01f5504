//! Service-level error type.

use std::borrow::Cow;

/// The error type for internal service failures.
///
/// Covers configuration problems and cryptographic operation failures that
/// are not caused by the caller's input.
#[derive(Debug, thiserror::Error)]
#[must_use = "service errors should be handled appropriately"]
pub enum ServiceError {
    /// Invalid or unusable service configuration.
    #[error("Service configuration error: {0}")]
    Config(Cow<'static, str>),

    /// Password hashing or verification failed for a non-credential reason.
    #[error("Credential hashing error: {0}")]
    Hashing(Cow<'static, str>),

    /// Signing a session token failed.
    #[error("Token issuance error: {0}")]
    TokenIssuance(Cow<'static, str>),
}

impl ServiceError {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a hashing error.
    #[inline]
    pub fn hashing(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Hashing(message.into())
    }

    /// Creates a token issuance error.
    #[inline]
    pub fn token_issuance(message: impl Into<Cow<'static, str>>) -> Self {
        Self::TokenIssuance(message.into())
    }
}

/// Specialized [`Result`] type for service operations.
pub type Result<T, E = ServiceError> = std::result::Result<T, E>;
