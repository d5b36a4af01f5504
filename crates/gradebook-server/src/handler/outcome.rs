//! The mutation outcome envelope.
//!
//! Every mutation returns `{ success, data?, token?, error? }` with HTTP
//! 200, regardless of how it failed: guard denials, token problems, and
//! persistence failures all collapse into `success: false` plus a message.

use gradebook_postgres::PgError;
use serde::{Deserialize, Serialize};

use crate::service::{GuardError, ServiceError};

/// Tracing target for rejected mutations.
const TRACING_TARGET: &str = "gradebook_server::handler::mutation";

/// Any failure a mutation can surface through the envelope.
#[derive(Debug, thiserror::Error)]
#[must_use = "mutation errors should be handled appropriately"]
pub enum MutationError {
    /// The authorization guard denied the operation.
    #[error(transparent)]
    Guard(#[from] GuardError),

    /// Registration with an email that already has an account.
    #[error("Email already registered")]
    EmailAlreadyRegistered,

    /// Login credentials matched no account.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// An update or delete affected zero rows.
    #[error("data wasn't stored in database")]
    NothingStored,

    /// Opaque persistence failure.
    #[error(transparent)]
    Persistence(#[from] PgError),

    /// Internal service failure (hashing, token signing).
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl From<crate::extract::TokenError> for MutationError {
    fn from(error: crate::extract::TokenError) -> Self {
        Self::Guard(GuardError::Token(error))
    }
}

/// Uniform response wrapper for mutations.
///
/// `success: false` implies `data` is absent and `error` describes the
/// failure; `token` is set only by register and login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[must_use]
pub struct MutationOutcome<T> {
    /// Whether the mutation took effect.
    pub success: bool,
    /// The affected entity, when the operation produces one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Freshly issued session token (register/login only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Human-readable failure description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> MutationOutcome<T> {
    /// A successful outcome carrying the affected entity.
    pub fn with_data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            token: None,
            error: None,
        }
    }

    /// A successful outcome carrying the entity and a fresh session token.
    pub fn with_token(data: T, token: String) -> Self {
        Self {
            success: true,
            data: Some(data),
            token: Some(token),
            error: None,
        }
    }

    /// A successful outcome with no payload (update/delete).
    pub fn applied() -> Self {
        Self {
            success: true,
            data: None,
            token: None,
            error: None,
        }
    }

    /// A failed outcome with a human-readable message.
    pub fn failure(error: impl ToString) -> Self {
        Self {
            success: false,
            data: None,
            token: None,
            error: Some(error.to_string()),
        }
    }

    /// Collapses a mutation result into the envelope, logging rejections.
    ///
    /// This is the single conversion point mandated for mutation handlers:
    /// no failure in the guard/persistence pipeline escapes as a transport
    /// error.
    pub fn capture(result: Result<Self, MutationError>, operation: &'static str) -> Self {
        match result {
            Ok(outcome) => outcome,
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    operation,
                    error = %error,
                    "Mutation rejected"
                );
                Self::failure(error)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn success_envelope_omits_error() {
        let outcome = MutationOutcome::with_data(42);
        let json = serde_json::to_value(&outcome).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["data"], 42);
        assert!(json.get("error").is_none());
        assert!(json.get("token").is_none());
    }

    #[test]
    fn failure_envelope_carries_message() {
        let outcome = MutationOutcome::<()>::failure(MutationError::NothingStored);
        let json = serde_json::to_value(&outcome).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "data wasn't stored in database");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn capture_collapses_errors() {
        let result: Result<MutationOutcome<()>, MutationError> =
            Err(MutationError::InvalidCredentials);
        let outcome = MutationOutcome::capture(result, "login");

        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("Invalid credentials"));
    }

    #[test]
    fn guard_denials_use_pinned_messages() {
        let outcome = MutationOutcome::<()>::failure(MutationError::Guard(
            crate::service::GuardError::Unauthorized,
        ));
        assert_eq!(outcome.error.as_deref(), Some("Unauthorize Operation"));

        let outcome =
            MutationOutcome::<()>::failure(MutationError::EmailAlreadyRegistered);
        assert_eq!(outcome.error.as_deref(), Some("Email already registered"));
    }
}
