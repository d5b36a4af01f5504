//! Class handlers: queries plus teacher-gated CRUD mutations.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::Json;
use gradebook_postgres::model::{NewClass, UpdateClass};
use gradebook_postgres::query::ClassRepository;
use gradebook_postgres::PgClient;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::extract::{TokenHeader, ValidateJson};
use crate::handler::response::ClassView;
use crate::handler::{ErrorKind, MutationError, MutationOutcome, Result};
use crate::service::{AuthGuard, ServiceState};

/// Tracing target for class operations.
const TRACING_TARGET: &str = "gradebook_server::handler::classes";

/// Request payload for creating a class.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct CreateClassRequest {
    /// Class name.
    #[validate(length(min = 1, max = 128))]
    pub name: String,
}

/// Request payload for updating a class. Absent fields are left unchanged.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct UpdateClassRequest {
    /// Class name.
    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,
}

/// Lists all classes.
#[tracing::instrument(skip_all)]
async fn list_classes(State(pg_client): State<PgClient>) -> Result<Json<Vec<ClassView>>> {
    let mut conn = pg_client.get_connection().await?;
    let classes = conn.list_classes().await?;

    Ok(Json(classes.into_iter().map(ClassView::from_model).collect()))
}

/// Retrieves a single class by id.
#[tracing::instrument(skip_all, fields(class_id))]
async fn get_class(
    State(pg_client): State<PgClient>,
    Path(class_id): Path<i32>,
) -> Result<Json<ClassView>> {
    let mut conn = pg_client.get_connection().await?;

    let Some(class) = conn.find_class_by_id(class_id).await? else {
        return Err(ErrorKind::NotFound
            .with_message(format!("Class not found: {class_id}")));
    };

    Ok(Json(ClassView::from_model(class)))
}

/// Creates a class. Teacher role required.
#[tracing::instrument(skip_all)]
async fn create_class(
    State(pg_client): State<PgClient>,
    State(auth_guard): State<AuthGuard>,
    TokenHeader(token): TokenHeader,
    ValidateJson(request): ValidateJson<CreateClassRequest>,
) -> Json<MutationOutcome<ClassView>> {
    let result = async {
        let claims = auth_guard.verify_claims(token.as_deref())?;

        let mut conn = pg_client.get_connection().await?;
        let actor = auth_guard.load_actor(&mut conn, &claims).await?;
        AuthGuard::require_teacher(&actor)?;

        let class = conn.create_class(NewClass { name: request.name }).await?;

        tracing::info!(
            target: TRACING_TARGET,
            class_id = class.id,
            actor_id = actor.id,
            "Class created"
        );

        Ok(MutationOutcome::with_data(ClassView::from_model(class)))
    }
    .await;

    Json(MutationOutcome::capture(result, "createClass"))
}

/// Applies a partial update to a class. Teacher role required.
#[tracing::instrument(skip_all, fields(class_id))]
async fn update_class(
    State(pg_client): State<PgClient>,
    State(auth_guard): State<AuthGuard>,
    TokenHeader(token): TokenHeader,
    Path(class_id): Path<i32>,
    ValidateJson(request): ValidateJson<UpdateClassRequest>,
) -> Json<MutationOutcome<ClassView>> {
    let result = async {
        let claims = auth_guard.verify_claims(token.as_deref())?;

        let mut conn = pg_client.get_connection().await?;
        let actor = auth_guard.load_actor(&mut conn, &claims).await?;
        AuthGuard::require_teacher(&actor)?;

        let changes = UpdateClass { name: request.name };
        let affected = conn.update_class(class_id, changes).await?;
        if affected == 0 {
            return Err(MutationError::NothingStored);
        }

        tracing::info!(
            target: TRACING_TARGET,
            class_id,
            actor_id = actor.id,
            "Class updated"
        );

        Ok(MutationOutcome::applied())
    }
    .await;

    Json(MutationOutcome::capture(result, "updateClass"))
}

/// Deletes a class. Teacher role required.
#[tracing::instrument(skip_all, fields(class_id))]
async fn delete_class(
    State(pg_client): State<PgClient>,
    State(auth_guard): State<AuthGuard>,
    TokenHeader(token): TokenHeader,
    Path(class_id): Path<i32>,
) -> Json<MutationOutcome<ClassView>> {
    let result = async {
        let claims = auth_guard.verify_claims(token.as_deref())?;

        let mut conn = pg_client.get_connection().await?;
        let actor = auth_guard.load_actor(&mut conn, &claims).await?;
        AuthGuard::require_teacher(&actor)?;

        let affected = conn.delete_class(class_id).await?;
        if affected == 0 {
            return Err(MutationError::NothingStored);
        }

        tracing::info!(
            target: TRACING_TARGET,
            class_id,
            actor_id = actor.id,
            "Class deleted"
        );

        Ok(MutationOutcome::applied())
    }
    .await;

    Json(MutationOutcome::capture(result, "deleteClass"))
}

/// Returns a [`Router`] with all related routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> axum::Router<ServiceState> {
    axum::Router::new()
        .route("/classes/", get(list_classes).post(create_class))
        .route(
            "/classes/{class_id}",
            get(get_class).patch(update_class).delete(delete_class),
        )
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::handler::test::create_test_server_with_router;

    #[tokio::test]
    async fn create_requires_a_token() -> anyhow::Result<()> {
        let server = create_test_server_with_router(routes()).await?;

        let response = server
            .post("/classes/")
            .json(&CreateClassRequest {
                name: "Mathematics".to_owned(),
            })
            .await;
        response.assert_status_ok();

        let body: MutationOutcome<ClassView> = response.json();
        assert!(!body.success);
        assert_eq!(body.error.as_deref(), Some("User not authenticated"));

        Ok(())
    }

    #[tokio::test]
    async fn update_rejects_malformed_tokens() -> anyhow::Result<()> {
        let server = create_test_server_with_router(routes()).await?;

        let response = server
            .patch("/classes/1")
            .add_header("token", "garbage")
            .json(&UpdateClassRequest {
                name: Some("Physics".to_owned()),
            })
            .await;
        response.assert_status_ok();

        let body: MutationOutcome<ClassView> = response.json();
        assert!(!body.success);
        assert_eq!(
            body.error.as_deref(),
            Some("malformed authentication token")
        );

        Ok(())
    }

    #[tokio::test]
    async fn delete_requires_a_token() -> anyhow::Result<()> {
        let server = create_test_server_with_router(routes()).await?;

        let response = server.delete("/classes/1").await;
        response.assert_status_ok();

        let body: MutationOutcome<ClassView> = response.json();
        assert!(!body.success);
        assert_eq!(body.error.as_deref(), Some("User not authenticated"));

        Ok(())
    }
}
