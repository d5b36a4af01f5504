//! Session signing keys for JWT authentication.
//!
//! This module loads and manages the process-wide symmetric secret used to
//! sign and verify session tokens. The secret lives for the whole process
//! and is shared read-only across requests.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

#[cfg(any(test, feature = "config"))]
use clap::Args;
use jsonwebtoken::{DecodingKey, EncodingKey};
use serde::{Deserialize, Serialize};

use crate::service::{Result, ServiceError};

/// Tracing target for session key management.
const TRACING_TARGET: &str = "gradebook_server::service::session_keys";

/// Minimum accepted secret length in bytes.
const MIN_SECRET_LEN: usize = 16;

/// Session secret configuration.
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "config"), derive(Args))]
pub struct SessionKeysConfig {
    /// Process-wide secret used to sign session tokens (HS256).
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "JWT_SECRET_KEY", hide_env_values = true)
    )]
    #[serde(default = "SessionKeysConfig::default_secret_key")]
    pub secret_key: String,

    /// Session token lifetime in seconds.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "JWT_TTL_SECS", default_value = "3600")
    )]
    #[serde(default = "SessionKeysConfig::default_token_ttl_secs")]
    pub token_ttl_secs: u64,
}

impl SessionKeysConfig {
    fn default_secret_key() -> String {
        // Development fallback only; deployments must set JWT_SECRET_KEY.
        "gradebook-insecure-dev-secret".to_owned()
    }

    fn default_token_ttl_secs() -> u64 {
        3600
    }
}

impl Default for SessionKeysConfig {
    fn default() -> Self {
        Self {
            secret_key: Self::default_secret_key(),
            token_ttl_secs: Self::default_token_ttl_secs(),
        }
    }
}

impl fmt::Debug for SessionKeysConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeysConfig")
            .field("secret_key", &"***")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .finish()
    }
}

/// Secret keys used for JWT session authentication.
///
/// This struct provides thread-safe access to the symmetric keys used for
/// encoding and decoding session tokens. Cloning is cheap: all clones share
/// the same key material.
#[derive(Clone)]
pub struct SessionKeys {
    inner: Arc<SessionKeysInner>,
}

/// Internal container for the actual key data.
struct SessionKeysInner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl: Duration,
}

impl SessionKeys {
    /// Creates a new `SessionKeys` instance from the provided configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the secret is empty or shorter than the minimum
    /// accepted length.
    pub fn from_config(config: &SessionKeysConfig) -> Result<Self> {
        let secret = config.secret_key.trim();

        if secret.len() < MIN_SECRET_LEN {
            tracing::error!(
                target: TRACING_TARGET,
                secret_len = secret.len(),
                "Session secret is too short"
            );
            return Err(ServiceError::config(format!(
                "session secret must be at least {MIN_SECRET_LEN} bytes"
            )));
        }

        if config.token_ttl_secs == 0 {
            return Err(ServiceError::config("session token TTL must be positive"));
        }

        tracing::info!(
            target: TRACING_TARGET,
            token_ttl_secs = config.token_ttl_secs,
            "Session keys loaded"
        );

        let inner = Arc::new(SessionKeysInner {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_ttl: Duration::from_secs(config.token_ttl_secs),
        });

        Ok(Self { inner })
    }

    /// Returns a reference to the encoding key.
    ///
    /// This key is used to sign session tokens.
    #[inline]
    pub fn encoding_key(&self) -> &EncodingKey {
        &self.inner.encoding_key
    }

    /// Returns a reference to the decoding key.
    ///
    /// This key is used to verify session tokens.
    #[inline]
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.inner.decoding_key
    }

    /// Returns the configured token lifetime.
    #[inline]
    pub fn token_ttl(&self) -> Duration {
        self.inner.token_ttl
    }
}

impl fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeys")
            .field("token_ttl", &self.inner.token_ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn accepts_default_config() {
        let keys = SessionKeys::from_config(&SessionKeysConfig::default());
        assert!(keys.is_ok());
    }

    #[test]
    fn rejects_short_secrets() {
        let config = SessionKeysConfig {
            secret_key: "short".to_owned(),
            ..SessionKeysConfig::default()
        };
        assert!(SessionKeys::from_config(&config).is_err());
    }

    #[test]
    fn rejects_zero_ttl() {
        let config = SessionKeysConfig {
            token_ttl_secs: 0,
            ..SessionKeysConfig::default()
        };
        assert!(SessionKeys::from_config(&config).is_err());
    }
}
