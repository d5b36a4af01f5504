//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! Query routes answer with plain JSON (or a status-coded [`ErrorResponse`]);
//! mutation routes always answer HTTP 200 with the [`MutationOutcome`]
//! envelope. The asymmetry is part of the API surface.
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler
//! [`ErrorResponse`]: crate::handler::response::ErrorResponse

mod authentication;
mod classes;
mod error;
mod grades;
mod outcome;
pub mod response;
mod users;

use axum::Router;
use axum::response::IntoResponse;

pub use crate::handler::error::{Error, ErrorKind, Result};
pub use crate::handler::outcome::{MutationError, MutationOutcome};
use crate::service::ServiceState;

#[inline]
async fn fallback() -> axum::response::Response {
    ErrorKind::NotFound.into_response()
}

/// Returns a [`Router`] with all routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .merge(authentication::routes())
        .merge(users::routes())
        .merge(classes::routes())
        .merge(grades::routes())
        .fallback(fallback)
}

#[cfg(test)]
mod test {
    use axum::Router;
    use axum_test::TestServer;

    use crate::handler::routes;
    use crate::service::{ServiceConfig, ServiceState};

    /// Returns a new [`TestServer`] with the given router.
    ///
    /// The database pool behind the state is lazy, so tests that never touch
    /// persistence run without a live PostgreSQL.
    pub async fn create_test_server_with_router(
        router: Router<ServiceState>,
    ) -> anyhow::Result<TestServer> {
        let config = ServiceConfig::default();
        let state = ServiceState::from_config(&config)?;
        let app = router.with_state(state);
        let server = TestServer::new(app)?;
        Ok(server)
    }

    /// Returns a new [`TestServer`] with the default router and state.
    pub async fn create_test_server() -> anyhow::Result<TestServer> {
        create_test_server_with_router(routes()).await
    }

    #[tokio::test]
    async fn handlers() -> anyhow::Result<()> {
        let server = create_test_server().await?;
        assert!(server.is_running());
        Ok(())
    }

    #[tokio::test]
    async fn unknown_routes_fall_back_to_not_found() -> anyhow::Result<()> {
        let server = create_test_server().await?;
        let response = server.get("/nope").await;
        response.assert_status_not_found();
        Ok(())
    }
}
