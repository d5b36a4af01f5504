//! Authorization guard gating every mutation.
//!
//! The guard runs a small per-request state machine: resolve the optional
//! token to a verified claim set, load the acting user by the claim subject,
//! then apply the operation's predicate (role or ownership). Nothing here is
//! persisted between requests.

use gradebook_postgres::model::User;
use gradebook_postgres::query::UserRepository;
use gradebook_postgres::{PgConnection, PgError};

use crate::extract::{SessionClaims, TokenError};
use crate::service::SessionKeys;

/// Tracing target for authorization decisions.
const TRACING_TARGET: &str = "gradebook_server::service::auth::guard";

/// Reasons the guard denies an operation.
///
/// All denial variants surface to the caller through the same envelope shape
/// (`success: false` plus a message); no variant maps to a distinct HTTP
/// status on mutation routes.
#[derive(Debug, thiserror::Error)]
#[must_use = "guard denials should be handled appropriately"]
pub enum GuardError {
    /// The operation requires a token, and none was supplied.
    #[error("User not authenticated")]
    NotAuthenticated,

    /// The operation requires the absence of a token, and one was supplied.
    #[error("User already authenticated")]
    AlreadyAuthenticated,

    /// The actor does not satisfy the operation's predicate.
    #[error("Unauthorize Operation")]
    Unauthorized,

    /// The supplied token failed verification.
    #[error(transparent)]
    Token(#[from] TokenError),

    /// Loading the actor failed in the persistence layer.
    #[error(transparent)]
    Persistence(#[from] PgError),
}

/// Authorization guard over verified session claims.
///
/// Holds the session keys; the persistence handle is passed per call, so the
/// guard owns no connection state.
#[derive(Debug, Clone)]
pub struct AuthGuard {
    session_keys: SessionKeys,
}

impl AuthGuard {
    /// Creates a guard over the given session keys.
    pub fn new(session_keys: SessionKeys) -> Self {
        Self { session_keys }
    }

    /// Requires that the caller did NOT supply a token.
    ///
    /// Register and login (and createUser, which mirrors register) refuse
    /// already-identified callers.
    pub fn require_anonymous(&self, token: Option<&str>) -> Result<(), GuardError> {
        match token {
            Some(_) => Err(GuardError::AlreadyAuthenticated),
            None => Ok(()),
        }
    }

    /// Requires a token and verifies it, returning the claim set.
    ///
    /// A missing token fails with [`GuardError::NotAuthenticated`]; an
    /// invalid one with the wrapped [`TokenError`]. Runs before any
    /// persistence access so token problems never cost a connection.
    pub fn verify_claims(&self, token: Option<&str>) -> Result<SessionClaims, GuardError> {
        let token = token.ok_or(GuardError::NotAuthenticated)?;
        let claims = SessionClaims::verify(token, &self.session_keys)?;
        Ok(claims)
    }

    /// Loads the acting user named by a verified claim set.
    ///
    /// A verified claim whose subject no longer exists is denied rather
    /// than trusted.
    pub async fn load_actor(
        &self,
        conn: &mut PgConnection,
        claims: &SessionClaims,
    ) -> Result<User, GuardError> {
        let Some(actor) = conn.find_user_by_id(claims.user_id).await? else {
            tracing::warn!(
                target: TRACING_TARGET,
                user_id = claims.user_id,
                "Verified token names a user that no longer exists"
            );
            return Err(GuardError::Unauthorized);
        };

        tracing::debug!(
            target: TRACING_TARGET,
            user_id = actor.id,
            role = %actor.role,
            "Caller authenticated"
        );

        Ok(actor)
    }

    /// Requires the actor to hold the Teacher role.
    ///
    /// Gates every class and grade mutation.
    pub fn require_teacher(actor: &User) -> Result<(), GuardError> {
        if actor.is_teacher() {
            Ok(())
        } else {
            tracing::debug!(
                target: TRACING_TARGET,
                user_id = actor.id,
                role = %actor.role,
                "Role predicate denied"
            );
            Err(GuardError::Unauthorized)
        }
    }

    /// Requires the actor to be the owner of the target user record.
    ///
    /// Gates updateUser and deleteUser: users may only modify themselves.
    pub fn require_owner(actor: &User, target_user_id: i32) -> Result<(), GuardError> {
        if actor.id == target_user_id {
            Ok(())
        } else {
            tracing::debug!(
                target: TRACING_TARGET,
                user_id = actor.id,
                target_user_id,
                "Ownership predicate denied"
            );
            Err(GuardError::Unauthorized)
        }
    }
}

#[cfg(test)]
mod test {
    use gradebook_postgres::types::UserRole;

    use super::*;
    use crate::service::SessionKeysConfig;

    fn user_with_role(id: i32, role: UserRole) -> User {
        let now = jiff_diesel::Timestamp::from(jiff::Timestamp::now());
        User {
            id,
            username: "alice".to_owned(),
            email: "a@x.com".to_owned(),
            password_hash: "$argon2id$stub".to_owned(),
            role,
            class_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn guard() -> AuthGuard {
        let keys = SessionKeys::from_config(&SessionKeysConfig::default()).unwrap();
        AuthGuard::new(keys)
    }

    #[test]
    fn missing_token_is_not_authenticated() {
        let guard = guard();
        assert!(matches!(
            guard.verify_claims(None),
            Err(GuardError::NotAuthenticated)
        ));
    }

    #[test]
    fn garbage_token_is_malformed() {
        let guard = guard();
        assert!(matches!(
            guard.verify_claims(Some("not-a-jwt")),
            Err(GuardError::Token(TokenError::Malformed))
        ));
    }

    #[test]
    fn anonymous_gate_rejects_token_bearers() {
        let guard = guard();
        assert!(guard.require_anonymous(None).is_ok());
        assert!(matches!(
            guard.require_anonymous(Some("some.jwt.token")),
            Err(GuardError::AlreadyAuthenticated)
        ));
    }

    #[test]
    fn role_gate_only_passes_teachers() {
        let teacher = user_with_role(1, UserRole::Teacher);
        let student = user_with_role(2, UserRole::Student);

        assert!(AuthGuard::require_teacher(&teacher).is_ok());
        assert!(matches!(
            AuthGuard::require_teacher(&student),
            Err(GuardError::Unauthorized)
        ));
    }

    #[test]
    fn ownership_gate_compares_subject_to_target() {
        let actor = user_with_role(5, UserRole::Student);

        assert!(AuthGuard::require_owner(&actor, 5).is_ok());
        assert!(matches!(
            AuthGuard::require_owner(&actor, 6),
            Err(GuardError::Unauthorized)
        ));
    }

    #[test]
    fn denial_messages_are_stable() {
        assert_eq!(
            GuardError::NotAuthenticated.to_string(),
            "User not authenticated"
        );
        assert_eq!(
            GuardError::AlreadyAuthenticated.to_string(),
            "User already authenticated"
        );
        assert_eq!(GuardError::Unauthorized.to_string(), "Unauthorize Operation");
    }
}
