//! User handlers: queries plus guarded CRUD mutations.
//!
//! Update and delete are ownership-gated: the claim subject must match the
//! target user id. Create mirrors registration (anonymous callers only) but
//! issues no session token.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::Json;
use gradebook_postgres::model::{NewUser, UpdateUser};
use gradebook_postgres::query::UserRepository;
use gradebook_postgres::types::UserRole;
use gradebook_postgres::PgClient;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::extract::{TokenHeader, ValidateJson};
use crate::handler::response::UserProfile;
use crate::handler::{ErrorKind, MutationError, MutationOutcome, Result};
use crate::service::{AuthGuard, AuthHasher, ServiceState};

/// Tracing target for user operations.
const TRACING_TARGET: &str = "gradebook_server::handler::users";

/// Request payload for creating a user.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct CreateUserRequest {
    /// Display/login name.
    #[validate(length(min = 1, max = 64))]
    pub username: String,
    /// Plaintext password; stored only as an Argon2id digest.
    #[validate(length(min = 1, max = 128))]
    pub password: String,
    /// Email address.
    #[validate(email)]
    pub email: String,
    /// Authorization role.
    pub role: UserRole,
    /// Class to enroll the user in, if any.
    pub class_id: Option<i32>,
}

/// Request payload for updating a user. Absent fields are left unchanged.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct UpdateUserRequest {
    /// Display/login name.
    #[validate(length(min = 1, max = 64))]
    pub username: Option<String>,
    /// New plaintext password; re-hashed before storage.
    #[validate(length(min = 1, max = 128))]
    pub password: Option<String>,
    /// Email address.
    #[validate(email)]
    pub email: Option<String>,
    /// Authorization role.
    pub role: Option<UserRole>,
    /// Class to enroll the user in.
    pub class_id: Option<i32>,
}

/// Lists all users.
#[tracing::instrument(skip_all)]
async fn list_users(State(pg_client): State<PgClient>) -> Result<Json<Vec<UserProfile>>> {
    let mut conn = pg_client.get_connection().await?;
    let users = conn.list_users().await?;

    Ok(Json(users.into_iter().map(UserProfile::from_model).collect()))
}

/// Retrieves a single user by id.
#[tracing::instrument(skip_all, fields(user_id))]
async fn get_user(
    State(pg_client): State<PgClient>,
    Path(user_id): Path<i32>,
) -> Result<Json<UserProfile>> {
    let mut conn = pg_client.get_connection().await?;

    let Some(user) = conn.find_user_by_id(user_id).await? else {
        return Err(ErrorKind::NotFound
            .with_message(format!("User not found: {user_id}")));
    };

    Ok(Json(UserProfile::from_model(user)))
}

/// Creates a user without issuing a session token.
///
/// Like registration, this refuses callers that already present a token.
#[tracing::instrument(skip_all)]
async fn create_user(
    State(pg_client): State<PgClient>,
    State(auth_hasher): State<AuthHasher>,
    State(auth_guard): State<AuthGuard>,
    TokenHeader(token): TokenHeader,
    ValidateJson(request): ValidateJson<CreateUserRequest>,
) -> Json<MutationOutcome<UserProfile>> {
    let result = async {
        auth_guard.require_anonymous(token.as_deref())?;

        let mut conn = pg_client.get_connection().await?;
        let password_hash = auth_hasher.hash_password(&request.password)?;

        let new_user = NewUser {
            username: request.username,
            email: request.email.to_lowercase(),
            password_hash,
            role: request.role,
            class_id: request.class_id,
        };
        let user = conn.create_user(new_user).await?;

        tracing::info!(
            target: TRACING_TARGET,
            user_id = user.id,
            role = %user.role,
            "User created"
        );

        Ok(MutationOutcome::with_data(UserProfile::from_model(user)))
    }
    .await;

    Json(MutationOutcome::capture(result, "createUser"))
}

/// Applies a partial update to the caller's own user record.
#[tracing::instrument(skip_all, fields(user_id))]
async fn update_user(
    State(pg_client): State<PgClient>,
    State(auth_hasher): State<AuthHasher>,
    State(auth_guard): State<AuthGuard>,
    TokenHeader(token): TokenHeader,
    Path(user_id): Path<i32>,
    ValidateJson(request): ValidateJson<UpdateUserRequest>,
) -> Json<MutationOutcome<UserProfile>> {
    let result = async {
        let claims = auth_guard.verify_claims(token.as_deref())?;

        let mut conn = pg_client.get_connection().await?;
        let actor = auth_guard.load_actor(&mut conn, &claims).await?;
        AuthGuard::require_owner(&actor, user_id)?;

        // A new password goes through the hasher; plaintext never reaches
        // the changeset.
        let password_hash = match request.password {
            Some(ref password) => Some(auth_hasher.hash_password(password)?),
            None => None,
        };

        let changes = UpdateUser {
            username: request.username,
            email: request.email.map(|email| email.to_lowercase()),
            password_hash,
            role: request.role,
            class_id: request.class_id,
        };

        let affected = conn.update_user(user_id, changes).await?;
        if affected == 0 {
            return Err(MutationError::NothingStored);
        }

        tracing::info!(target: TRACING_TARGET, user_id, "User updated");
        Ok(MutationOutcome::applied())
    }
    .await;

    Json(MutationOutcome::capture(result, "updateUser"))
}

/// Deletes the caller's own user record.
#[tracing::instrument(skip_all, fields(user_id))]
async fn delete_user(
    State(pg_client): State<PgClient>,
    State(auth_guard): State<AuthGuard>,
    TokenHeader(token): TokenHeader,
    Path(user_id): Path<i32>,
) -> Json<MutationOutcome<UserProfile>> {
    let result = async {
        let claims = auth_guard.verify_claims(token.as_deref())?;

        let mut conn = pg_client.get_connection().await?;
        let actor = auth_guard.load_actor(&mut conn, &claims).await?;
        AuthGuard::require_owner(&actor, user_id)?;

        let affected = conn.delete_user(user_id).await?;
        if affected == 0 {
            return Err(MutationError::NothingStored);
        }

        tracing::info!(target: TRACING_TARGET, user_id, "User deleted");
        Ok(MutationOutcome::applied())
    }
    .await;

    Json(MutationOutcome::capture(result, "deleteUser"))
}

/// Returns a [`Router`] with all related routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> axum::Router<ServiceState> {
    axum::Router::new()
        .route("/users/", get(list_users).post(create_user))
        .route(
            "/users/{user_id}",
            get(get_user).patch(update_user).delete(delete_user),
        )
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::handler::test::create_test_server_with_router;

    #[tokio::test]
    async fn update_requires_a_token() -> anyhow::Result<()> {
        let server = create_test_server_with_router(routes()).await?;

        let response = server
            .patch("/users/1")
            .json(&UpdateUserRequest {
                username: Some("bob".to_owned()),
                ..UpdateUserRequest::default()
            })
            .await;
        response.assert_status_ok();

        let body: MutationOutcome<UserProfile> = response.json();
        assert!(!body.success);
        assert_eq!(body.error.as_deref(), Some("User not authenticated"));

        Ok(())
    }

    #[tokio::test]
    async fn delete_rejects_malformed_tokens() -> anyhow::Result<()> {
        let server = create_test_server_with_router(routes()).await?;

        let response = server
            .delete("/users/1")
            .add_header("token", "garbage")
            .await;
        response.assert_status_ok();

        let body: MutationOutcome<UserProfile> = response.json();
        assert!(!body.success);
        assert_eq!(
            body.error.as_deref(),
            Some("malformed authentication token")
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_rejects_token_bearing_callers() -> anyhow::Result<()> {
        let server = create_test_server_with_router(routes()).await?;

        let request = CreateUserRequest {
            username: "bob".to_owned(),
            password: "p1".to_owned(),
            email: "b@x.com".to_owned(),
            role: UserRole::Student,
            class_id: None,
        };

        let response = server
            .post("/users/")
            .add_header("token", "some.session.token")
            .json(&request)
            .await;
        response.assert_status_ok();

        let body: MutationOutcome<UserProfile> = response.json();
        assert!(!body.success);
        assert_eq!(body.error.as_deref(), Some("User already authenticated"));

        Ok(())
    }
}
