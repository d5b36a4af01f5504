//! Session token claims: issuance and verification.
//!
//! A session token is an HS256 JWT carrying the registered claims plus the
//! user id as subject. The claims of a decoded token are trustworthy only
//! after signature and expiry verification; [`SessionClaims::verify`] is the
//! single decode path in the crate.

use std::borrow::Cow;
use std::time::Duration;

use jsonwebtoken::{Algorithm, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::service::{Result as ServiceResult, ServiceError, SessionKeys};

/// Tracing target for token operations.
const TRACING_TARGET: &str = "gradebook_server::extract::claims";

/// JWT claims for session tokens.
///
/// Timestamps are UTC Unix seconds, as required for `exp` validation.
#[derive(Debug, Clone, Serialize, Deserialize, Hash, PartialEq, Eq)]
pub struct SessionClaims {
    /// Issuer (who created the token).
    #[serde(rename = "iss")]
    issued_by: Cow<'static, str>,
    /// Audience (who the token is intended for).
    #[serde(rename = "aud")]
    audience: Cow<'static, str>,

    /// Subject: id of the authenticated user.
    #[serde(rename = "sub")]
    pub user_id: i32,

    /// Issued at (Unix seconds).
    #[serde(rename = "iat")]
    pub issued_at: i64,
    /// Expiration time (Unix seconds).
    #[serde(rename = "exp")]
    pub expires_at: i64,
}

/// Reasons a token fails verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[must_use = "token errors should be handled appropriately"]
pub enum TokenError {
    /// The token is not a structurally valid JWT or misses required claims.
    #[error("malformed authentication token")]
    Malformed,
    /// The signature does not match the process secret.
    #[error("authentication token signature is invalid")]
    SignatureInvalid,
    /// The token expired.
    #[error("authentication token has expired")]
    Expired,
}

impl SessionClaims {
    /// JWT issuer identifier for session tokens.
    const JWT_ISSUER: &'static str = "gradebook";
    /// JWT audience identifier for session tokens.
    const JWT_AUDIENCE: &'static str = "gradebook:server";

    /// Creates a claim set for the given user, valid for `ttl` from now.
    pub fn new(user_id: i32, ttl: Duration) -> Self {
        let issued_at = jiff::Timestamp::now().as_second();
        Self {
            issued_by: Cow::Borrowed(Self::JWT_ISSUER),
            audience: Cow::Borrowed(Self::JWT_AUDIENCE),
            user_id,
            issued_at,
            expires_at: issued_at + ttl.as_secs() as i64,
        }
    }

    /// Issues a signed session token for the given user.
    ///
    /// Any alteration of the embedded claims or timestamps invalidates the
    /// signature.
    ///
    /// # Errors
    ///
    /// Returns a service error if signing fails.
    pub fn issue(user_id: i32, keys: &SessionKeys) -> ServiceResult<String> {
        let claims = Self::new(user_id, keys.token_ttl());

        let token = encode(&Header::new(Algorithm::HS256), &claims, keys.encoding_key()).map_err(
            |e| {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %e,
                    user_id = claims.user_id,
                    "Failed to encode session token"
                );
                ServiceError::token_issuance("Unable to sign session token")
            },
        )?;

        tracing::debug!(
            target: TRACING_TARGET,
            user_id = claims.user_id,
            expires_at = claims.expires_at,
            "Session token issued"
        );

        Ok(token)
    }

    /// Verifies a session token and returns its claims.
    ///
    /// Validates the signature, issuer, audience, claim presence, and expiry
    /// (with zero leeway). Claims are never returned from an unverified
    /// decode.
    ///
    /// # Errors
    ///
    /// Returns a [`TokenError`] describing the first validation failure.
    pub fn verify(token: &str, keys: &SessionKeys) -> Result<Self, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_nbf = false; // Not Before claim not used
        validation.validate_aud = true;
        validation.set_audience(&[Self::JWT_AUDIENCE]);
        validation.set_issuer(&[Self::JWT_ISSUER]);
        validation.set_required_spec_claims(&["iss", "aud", "sub", "iat", "exp"]);

        let token_data =
            decode::<Self>(token, keys.decoding_key(), &validation).map_err(|e| {
                let token_error = TokenError::from(e);
                tracing::warn!(
                    target: TRACING_TARGET,
                    error = %token_error,
                    "Session token verification failed"
                );
                token_error
            })?;

        Ok(token_data.claims)
    }

    /// Checks if the claims have expired based on current UTC time.
    #[inline]
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at <= jiff::Timestamp::now().as_second()
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(error: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match error.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::SignatureInvalid,
            _ => TokenError::Malformed,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::service::SessionKeysConfig;

    fn keys_with_secret(secret: &str) -> SessionKeys {
        let config = SessionKeysConfig {
            secret_key: secret.to_owned(),
            token_ttl_secs: 3600,
        };
        SessionKeys::from_config(&config).expect("session keys")
    }

    #[test]
    fn issued_token_verifies_before_expiry() {
        let keys = keys_with_secret("test-secret-key-0123456789");

        let token = SessionClaims::issue(42, &keys).unwrap();
        let claims = SessionClaims::verify(&token, &keys).unwrap();

        assert_eq!(claims.user_id, 42);
        assert!(!claims.is_expired());
        assert_eq!(claims.expires_at - claims.issued_at, 3600);
    }

    #[test]
    fn expired_token_fails_with_expired() {
        let keys = keys_with_secret("test-secret-key-0123456789");

        let mut claims = SessionClaims::new(7, Duration::from_secs(3600));
        claims.issued_at -= 7200;
        claims.expires_at -= 7200;

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            keys.encoding_key(),
        )
        .unwrap();

        assert_eq!(
            SessionClaims::verify(&token, &keys),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn foreign_secret_fails_with_signature_invalid() {
        let keys = keys_with_secret("test-secret-key-0123456789");
        let other_keys = keys_with_secret("another-secret-key-987654321");

        let token = SessionClaims::issue(7, &keys).unwrap();

        assert_eq!(
            SessionClaims::verify(&token, &other_keys),
            Err(TokenError::SignatureInvalid)
        );
    }

    #[test]
    fn garbage_fails_with_malformed() {
        let keys = keys_with_secret("test-secret-key-0123456789");

        assert_eq!(
            SessionClaims::verify("definitely.not.a-jwt", &keys),
            Err(TokenError::Malformed)
        );
        assert_eq!(SessionClaims::verify("", &keys), Err(TokenError::Malformed));
    }

    #[test]
    fn tampered_claims_fail_verification() {
        let keys = keys_with_secret("test-secret-key-0123456789");

        // Splice the payload of one token onto the signature of another.
        let token_a = SessionClaims::issue(7, &keys).unwrap();
        let token_b = SessionClaims::issue(8, &keys).unwrap();
        let a: Vec<&str> = token_a.split('.').collect();
        let b: Vec<&str> = token_b.split('.').collect();

        let forged = format!("{}.{}.{}", b[0], b[1], a[2]);
        assert!(SessionClaims::verify(&forged, &keys).is_err());
    }
}
