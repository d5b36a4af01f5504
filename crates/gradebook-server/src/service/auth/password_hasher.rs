//! Secure password hashing and verification using Argon2id.
//!
//! Hashes are produced in PHC string format with a fresh random salt per
//! call, so hashing the same plaintext twice yields different digests.
//! Verification parses the stored digest and runs the timing-safe argon2
//! comparison; it never compares digests by equality.

use argon2::password_hash::{Error as ArgonError, SaltString};
use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher as _, PasswordVerifier, Version,
};
use rand::rngs::OsRng;

use crate::service::{Result, ServiceError};

/// Tracing target for password hashing operations.
const TRACING_TARGET: &str = "gradebook_server::service::auth::hasher";

/// Fixed plaintext used to derive the dummy digest for absent accounts.
const DUMMY_PASSWORD: &str = "gradebook-dummy-password";

/// Secure password hashing and verification service using Argon2id.
///
/// Uses OWASP recommended parameters (19 MiB memory, 2 iterations, 1 thread)
/// and cryptographically secure random salt generation.
#[derive(Debug, Clone)]
pub struct AuthHasher {
    argon2: Argon2<'static>,
    dummy_hash: String,
}

impl AuthHasher {
    /// Creates a new password hashing service with OWASP recommended configuration.
    ///
    /// # Errors
    ///
    /// Returns a service error if Argon2 initialization fails.
    pub fn new() -> Result<Self> {
        let params = Params::new(
            19456, // 19 MB - OWASP recommended
            2,     // 2 iterations - OWASP recommended
            1,     // 1 thread - OWASP recommended
            None,  // Use default output length (32 bytes)
        )
        .map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                error = %e,
                "Failed to create Argon2 parameters"
            );

            ServiceError::config("Invalid password hashing configuration")
        })?;

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        // Pre-computed digest used to keep login timing independent of
        // whether any candidate account exists.
        let salt = SaltString::try_from_rng(&mut OsRng)
            .map_err(|_| ServiceError::hashing("Salt generation failed"))?;
        let dummy_hash = argon2
            .hash_password(DUMMY_PASSWORD.as_bytes(), &salt)
            .map_err(|_| ServiceError::hashing("Dummy digest generation failed"))?
            .to_string();

        Ok(Self { argon2, dummy_hash })
    }

    /// Hashes a password using Argon2id with a cryptographically secure random salt.
    ///
    /// The returned PHC string includes the algorithm, parameters, salt, and
    /// hash value, and can be stored directly in the database.
    ///
    /// # Errors
    ///
    /// Returns a service error if salt generation or the hashing operation
    /// fails. The password itself is never logged.
    pub fn hash_password(&self, password: &str) -> Result<String> {
        let salt = SaltString::try_from_rng(&mut OsRng).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                error = %e,
                "Failed to generate cryptographically secure salt"
            );
            ServiceError::hashing("Salt generation failed")
        })?;

        let password_hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %e,
                    "Password hashing operation failed"
                );
                ServiceError::hashing("Hash generation failed")
            })?;

        Ok(password_hash.to_string())
    }

    /// Verifies a password against a stored digest.
    ///
    /// Returns `Ok(true)` if the password matches, `Ok(false)` if it does
    /// not. The comparison is timing-safe and does not leak where a mismatch
    /// occurs.
    ///
    /// # Errors
    ///
    /// Returns a service error if the stored digest cannot be parsed or the
    /// verification fails for a non-credential reason.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(stored_hash).map_err(|e| {
            tracing::warn!(
                target: TRACING_TARGET,
                error = %e,
                "Invalid password digest format in storage"
            );
            ServiceError::hashing("Stored digest format error")
        })?;

        match self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
        {
            Ok(()) => Ok(true),
            Err(ArgonError::Password) => Ok(false),
            Err(e) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %e,
                    "Password verification failed for a non-credential reason"
                );
                Err(ServiceError::hashing("Verification failure"))
            }
        }
    }

    /// Burns a verification against a fixed dummy digest.
    ///
    /// Called when login finds no candidate account, so the request takes
    /// the same time as a real verification and does not reveal whether the
    /// username exists.
    pub fn verify_dummy_password(&self, password: &str) -> bool {
        self.verify_password(password, &self.dummy_hash)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn hasher() -> AuthHasher {
        AuthHasher::new().expect("hasher construction")
    }

    #[test]
    fn verifies_matching_password() {
        let hasher = hasher();
        let digest = hasher.hash_password("correct horse battery staple").unwrap();
        assert!(
            hasher
                .verify_password("correct horse battery staple", &digest)
                .unwrap()
        );
    }

    #[test]
    fn rejects_wrong_password() {
        let hasher = hasher();
        let digest = hasher.hash_password("p1").unwrap();
        assert!(!hasher.verify_password("p2", &digest).unwrap());
    }

    #[test]
    fn salts_make_digests_unique() {
        let hasher = hasher();
        let first = hasher.hash_password("p1").unwrap();
        let second = hasher.hash_password("p1").unwrap();
        assert_ne!(first, second);
        assert_ne!(first, "p1");
    }

    #[test]
    fn rejects_malformed_stored_digest() {
        let hasher = hasher();
        assert!(hasher.verify_password("p1", "not-a-phc-string").is_err());
    }

    #[test]
    fn dummy_verification_never_matches() {
        let hasher = hasher();
        assert!(!hasher.verify_dummy_password("anything"));
    }
}
