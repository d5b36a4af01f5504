//! Grade handlers: queries plus teacher-gated CRUD mutations.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::Json;
use gradebook_postgres::model::{NewGrade, UpdateGrade};
use gradebook_postgres::query::GradeRepository;
use gradebook_postgres::PgClient;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::extract::{TokenHeader, ValidateJson};
use crate::handler::response::GradeView;
use crate::handler::{ErrorKind, MutationError, MutationOutcome, Result};
use crate::service::{AuthGuard, ServiceState};

/// Tracing target for grade operations.
const TRACING_TARGET: &str = "gradebook_server::handler::grades";

/// Request payload for creating a grade.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct CreateGradeRequest {
    /// What the grade is awarded for.
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    /// Numeric grade value.
    pub value: f64,
    /// User the grade belongs to.
    pub user_id: i32,
}

/// Request payload for updating a grade. Absent fields are left unchanged.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct UpdateGradeRequest {
    /// What the grade is awarded for.
    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,
    /// Numeric grade value.
    pub value: Option<f64>,
    /// User the grade belongs to.
    pub user_id: Option<i32>,
}

/// Optional filter for grade listings.
#[must_use]
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GradeFilter {
    /// Restrict the listing to one user's grades.
    pub user_id: Option<i32>,
}

/// Lists grades, optionally filtered by user.
#[tracing::instrument(skip_all)]
async fn list_grades(
    State(pg_client): State<PgClient>,
    Query(filter): Query<GradeFilter>,
) -> Result<Json<Vec<GradeView>>> {
    let mut conn = pg_client.get_connection().await?;

    let grades = match filter.user_id {
        Some(user_id) => conn.find_grades_by_user(user_id).await?,
        None => conn.list_grades().await?,
    };

    Ok(Json(grades.into_iter().map(GradeView::from_model).collect()))
}

/// Retrieves a single grade by id.
#[tracing::instrument(skip_all, fields(grade_id))]
async fn get_grade(
    State(pg_client): State<PgClient>,
    Path(grade_id): Path<i32>,
) -> Result<Json<GradeView>> {
    let mut conn = pg_client.get_connection().await?;

    let Some(grade) = conn.find_grade_by_id(grade_id).await? else {
        return Err(ErrorKind::NotFound
            .with_message(format!("Grade not found: {grade_id}")));
    };

    Ok(Json(GradeView::from_model(grade)))
}

/// Creates a grade. Teacher role required.
#[tracing::instrument(skip_all)]
async fn create_grade(
    State(pg_client): State<PgClient>,
    State(auth_guard): State<AuthGuard>,
    TokenHeader(token): TokenHeader,
    ValidateJson(request): ValidateJson<CreateGradeRequest>,
) -> Json<MutationOutcome<GradeView>> {
    let result = async {
        let claims = auth_guard.verify_claims(token.as_deref())?;

        let mut conn = pg_client.get_connection().await?;
        let actor = auth_guard.load_actor(&mut conn, &claims).await?;
        AuthGuard::require_teacher(&actor)?;

        let new_grade = NewGrade {
            name: request.name,
            value: request.value,
            user_id: request.user_id,
        };
        let grade = conn.create_grade(new_grade).await?;

        tracing::info!(
            target: TRACING_TARGET,
            grade_id = grade.id,
            user_id = grade.user_id,
            actor_id = actor.id,
            "Grade created"
        );

        Ok(MutationOutcome::with_data(GradeView::from_model(grade)))
    }
    .await;

    Json(MutationOutcome::capture(result, "createGrade"))
}

/// Applies a partial update to a grade. Teacher role required.
#[tracing::instrument(skip_all, fields(grade_id))]
async fn update_grade(
    State(pg_client): State<PgClient>,
    State(auth_guard): State<AuthGuard>,
    TokenHeader(token): TokenHeader,
    Path(grade_id): Path<i32>,
    ValidateJson(request): ValidateJson<UpdateGradeRequest>,
) -> Json<MutationOutcome<GradeView>> {
    let result = async {
        let claims = auth_guard.verify_claims(token.as_deref())?;

        let mut conn = pg_client.get_connection().await?;
        let actor = auth_guard.load_actor(&mut conn, &claims).await?;
        AuthGuard::require_teacher(&actor)?;

        let changes = UpdateGrade {
            name: request.name,
            value: request.value,
            user_id: request.user_id,
        };
        let affected = conn.update_grade(grade_id, changes).await?;
        if affected == 0 {
            return Err(MutationError::NothingStored);
        }

        tracing::info!(
            target: TRACING_TARGET,
            grade_id,
            actor_id = actor.id,
            "Grade updated"
        );

        Ok(MutationOutcome::applied())
    }
    .await;

    Json(MutationOutcome::capture(result, "updateGrade"))
}

/// Deletes a grade. Teacher role required.
#[tracing::instrument(skip_all, fields(grade_id))]
async fn delete_grade(
    State(pg_client): State<PgClient>,
    State(auth_guard): State<AuthGuard>,
    TokenHeader(token): TokenHeader,
    Path(grade_id): Path<i32>,
) -> Json<MutationOutcome<GradeView>> {
    let result = async {
        let claims = auth_guard.verify_claims(token.as_deref())?;

        let mut conn = pg_client.get_connection().await?;
        let actor = auth_guard.load_actor(&mut conn, &claims).await?;
        AuthGuard::require_teacher(&actor)?;

        let affected = conn.delete_grade(grade_id).await?;
        if affected == 0 {
            return Err(MutationError::NothingStored);
        }

        tracing::info!(
            target: TRACING_TARGET,
            grade_id,
            actor_id = actor.id,
            "Grade deleted"
        );

        Ok(MutationOutcome::applied())
    }
    .await;

    Json(MutationOutcome::capture(result, "deleteGrade"))
}

/// Returns a [`Router`] with all related routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> axum::Router<ServiceState> {
    axum::Router::new()
        .route("/grades/", get(list_grades).post(create_grade))
        .route(
            "/grades/{grade_id}",
            get(get_grade).patch(update_grade).delete(delete_grade),
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
            .post("/grades/")
            .json(&CreateGradeRequest {
                name: "Algebra quiz".to_owned(),
                value: 17.5,
                user_id: 1,
            })
            .await;
        response.assert_status_ok();

        let body: MutationOutcome<GradeView> = response.json();
        assert!(!body.success);
        assert_eq!(body.error.as_deref(), Some("User not authenticated"));

        Ok(())
    }

    #[tokio::test]
    async fn update_rejects_malformed_tokens() -> anyhow::Result<()> {
        let server = create_test_server_with_router(routes()).await?;

        let response = server
            .patch("/grades/1")
            .add_header("token", "garbage")
            .json(&UpdateGradeRequest {
                value: Some(12.0),
                ..UpdateGradeRequest::default()
            })
            .await;
        response.assert_status_ok();

        let body: MutationOutcome<GradeView> = response.json();
        assert!(!body.success);
        assert_eq!(
            body.error.as_deref(),
            Some("malformed authentication token")
        );

        Ok(())
    }
}
