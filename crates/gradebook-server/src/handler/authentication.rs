//! Authentication handlers for registration and login.
//!
//! Both operations refuse callers that already present a session token.
//! Login verifies the password against every account sharing the username,
//! sequentially, short-circuiting on the first match; register hashes the
//! password before it ever reaches the persistence layer.

use axum::Json;
use axum::extract::State;
use axum::routing::post;
use gradebook_postgres::model::NewUser;
use gradebook_postgres::query::UserRepository;
use gradebook_postgres::types::UserRole;
use gradebook_postgres::PgClient;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::extract::{SessionClaims, TokenHeader, ValidateJson};
use crate::handler::response::UserProfile;
use crate::handler::{MutationError, MutationOutcome};
use crate::service::{AuthGuard, AuthHasher, ServiceState, SessionKeys};

/// Tracing target for authentication operations.
const TRACING_TARGET: &str = "gradebook_server::handler::authentication";

/// Request payload for registration.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct RegisterRequest {
    /// Display/login name of the new account.
    #[validate(length(min = 1, max = 64))]
    pub username: String,
    /// Plaintext password; stored only as an Argon2id digest.
    #[validate(length(min = 1, max = 128))]
    pub password: String,
    /// Email address, unique across accounts.
    #[validate(email)]
    pub email: String,
    /// Authorization role of the new account.
    pub role: UserRole,
    /// Class to enroll the account in, if any.
    pub class_id: Option<i32>,
}

/// Request payload for login.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct LoginRequest {
    /// Username to look up. Not unique: all candidates are checked.
    #[validate(length(min = 1, max = 64))]
    pub username: String,
    /// Plaintext password to verify.
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Creates a new account and issues a session token for it.
#[tracing::instrument(skip_all)]
async fn register(
    State(pg_client): State<PgClient>,
    State(auth_hasher): State<AuthHasher>,
    State(auth_guard): State<AuthGuard>,
    State(session_keys): State<SessionKeys>,
    TokenHeader(token): TokenHeader,
    ValidateJson(request): ValidateJson<RegisterRequest>,
) -> Json<MutationOutcome<UserProfile>> {
    tracing::trace!(
        target: TRACING_TARGET,
        username = %request.username,
        email = %request.email,
        "registration attempt"
    );

    let result = async {
        // An already-identified caller may not register again.
        auth_guard.require_anonymous(token.as_deref())?;

        let mut conn = pg_client.get_connection().await?;
        let normalized_email = request.email.to_lowercase();

        if conn.email_exists(&normalized_email).await? {
            tracing::warn!(
                target: TRACING_TARGET,
                email = %normalized_email,
                "registration failed: email already exists"
            );
            return Err(MutationError::EmailAlreadyRegistered);
        }

        let password_hash = auth_hasher.hash_password(&request.password)?;

        let new_user = NewUser {
            username: request.username,
            email: normalized_email,
            password_hash,
            role: request.role,
            class_id: request.class_id,
        };
        let user = conn.create_user(new_user).await?;

        let session_token = SessionClaims::issue(user.id, &session_keys)?;

        tracing::info!(
            target: TRACING_TARGET,
            user_id = user.id,
            email = %user.email,
            role = %user.role,
            "registration successful: session token issued"
        );

        Ok(MutationOutcome::with_token(
            UserProfile::from_model(user),
            session_token,
        ))
    }
    .await;

    Json(MutationOutcome::capture(result, "register"))
}

/// Verifies credentials and issues a session token.
#[tracing::instrument(skip_all)]
async fn login(
    State(pg_client): State<PgClient>,
    State(auth_hasher): State<AuthHasher>,
    State(auth_guard): State<AuthGuard>,
    State(session_keys): State<SessionKeys>,
    TokenHeader(token): TokenHeader,
    ValidateJson(request): ValidateJson<LoginRequest>,
) -> Json<MutationOutcome<UserProfile>> {
    tracing::trace!(
        target: TRACING_TARGET,
        username = %request.username,
        "login attempt"
    );

    let result = async {
        // An already-identified caller may not log in again.
        auth_guard.require_anonymous(token.as_deref())?;

        let mut conn = pg_client.get_connection().await?;
        let candidates = conn.find_users_by_username(&request.username).await?;

        if candidates.is_empty() {
            // Burn an equivalent verification so the response time does not
            // reveal whether the username exists.
            auth_hasher.verify_dummy_password(&request.password);

            tracing::warn!(
                target: TRACING_TARGET,
                username = %request.username,
                "login failed: no such username"
            );
            return Err(MutationError::InvalidCredentials);
        }

        // Sequential scan over same-username candidates; first verified
        // password wins.
        let mut matched = None;
        for candidate in candidates {
            if auth_hasher.verify_password(&request.password, &candidate.password_hash)? {
                matched = Some(candidate);
                break;
            }
        }

        let Some(user) = matched else {
            tracing::warn!(
                target: TRACING_TARGET,
                username = %request.username,
                "login failed: password matched no candidate"
            );
            return Err(MutationError::InvalidCredentials);
        };

        let session_token = SessionClaims::issue(user.id, &session_keys)?;

        tracing::info!(
            target: TRACING_TARGET,
            user_id = user.id,
            username = %user.username,
            "login successful: session token issued"
        );

        Ok(MutationOutcome::with_token(
            UserProfile::from_model(user),
            session_token,
        ))
    }
    .await;

    Json(MutationOutcome::capture(result, "login"))
}

/// Returns a [`Router`] with all related routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> axum::Router<ServiceState> {
    axum::Router::new()
        .route("/auth/register/", post(register))
        .route("/auth/login/", post(login))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::handler::test::create_test_server_with_router;

    #[tokio::test]
    async fn register_rejects_token_bearing_callers() -> anyhow::Result<()> {
        let server = create_test_server_with_router(routes()).await?;

        let request = RegisterRequest {
            username: "alice".to_owned(),
            password: "p1".to_owned(),
            email: "a@x.com".to_owned(),
            role: UserRole::Teacher,
            class_id: None,
        };

        let response = server
            .post("/auth/register/")
            .add_header("token", "some.session.token")
            .json(&request)
            .await;
        response.assert_status_ok();

        let body: MutationOutcome<UserProfile> = response.json();
        assert!(!body.success);
        assert!(body.token.is_none());
        assert_eq!(body.error.as_deref(), Some("User already authenticated"));

        Ok(())
    }

    #[tokio::test]
    async fn login_rejects_token_bearing_callers() -> anyhow::Result<()> {
        let server = create_test_server_with_router(routes()).await?;

        let request = LoginRequest {
            username: "alice".to_owned(),
            password: "p1".to_owned(),
        };

        let response = server
            .post("/auth/login/")
            .add_header("token", "some.session.token")
            .json(&request)
            .await;
        response.assert_status_ok();

        let body: MutationOutcome<UserProfile> = response.json();
        assert!(!body.success);
        assert_eq!(body.error.as_deref(), Some("User already authenticated"));

        Ok(())
    }

    #[tokio::test]
    async fn register_rejects_invalid_email() -> anyhow::Result<()> {
        let server = create_test_server_with_router(routes()).await?;

        let request = serde_json::json!({
            "username": "alice",
            "password": "p1",
            "email": "not-an-email",
            "role": "Teacher"
        });

        let response = server.post("/auth/register/").json(&request).await;
        response.assert_status_bad_request();

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a running PostgreSQL (set POSTGRES_URL)"]
    async fn register_then_login_roundtrip() -> anyhow::Result<()> {
        let server = create_test_server_with_router(routes()).await?;

        let register_request = RegisterRequest {
            username: "alice".to_owned(),
            password: "p1".to_owned(),
            email: "alice@example.com".to_owned(),
            role: UserRole::Teacher,
            class_id: None,
        };

        let response = server.post("/auth/register/").json(&register_request).await;
        response.assert_status_ok();

        let body: MutationOutcome<UserProfile> = response.json();
        assert!(body.success);
        assert!(body.token.is_some_and(|token| !token.is_empty()));

        let login_request = LoginRequest {
            username: "alice".to_owned(),
            password: "p1".to_owned(),
        };

        let response = server.post("/auth/login/").json(&login_request).await;
        let body: MutationOutcome<UserProfile> = response.json();
        assert!(body.success);
        assert!(body.token.is_some());

        // Wrong password yields a failure without a token.
        let bad_login = LoginRequest {
            username: "alice".to_owned(),
            password: "wrong".to_owned(),
        };

        let response = server.post("/auth/login/").json(&bad_login).await;
        let body: MutationOutcome<UserProfile> = response.json();
        assert!(!body.success);
        assert!(body.token.is_none());
        assert_eq!(body.error.as_deref(), Some("Invalid credentials"));

        Ok(())
    }
}
