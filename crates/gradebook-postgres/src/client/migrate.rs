//! Embedded migration runner.

use diesel::Connection;
use diesel_migrations::MigrationHarness;

use crate::{MIGRATIONS, PgConfig, PgError, PgResult, TRACING_TARGET_MIGRATION};

/// Runs all pending embedded migrations against the configured database.
///
/// Migrations run on a dedicated blocking connection because the Diesel
/// migration harness is synchronous.
///
/// Returns the versions of the migrations that were applied.
pub async fn run_pending_migrations(config: &PgConfig) -> PgResult<Vec<String>> {
    let database_url = config.postgres_url.clone();

    let applied = tokio::task::spawn_blocking(move || {
        let mut conn =
            diesel::PgConnection::establish(&database_url).map_err(PgError::Connection)?;

        let versions = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(PgError::Migration)?;

        Ok::<_, PgError>(versions.iter().map(ToString::to_string).collect::<Vec<_>>())
    })
    .await
    .map_err(|e| PgError::Unexpected(format!("migration task failed: {e}").into()))??;

    if applied.is_empty() {
        tracing::debug!(target: TRACING_TARGET_MIGRATION, "No pending migrations");
    } else {
        tracing::info!(
            target: TRACING_TARGET_MIGRATION,
            count = applied.len(),
            versions = ?applied,
            "Applied pending migrations"
        );
    }

    Ok(applied)
}
