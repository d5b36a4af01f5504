//! High-level database client over a lazy async connection pool.

use std::fmt;
use std::sync::Arc;

use deadpool::managed::Pool;
use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;

use crate::{PgConfig, PgError, PgResult, TRACING_TARGET_CONNECTION};

/// Async connection pool backing [`PgClient`].
pub type ConnectionPool = Pool<AsyncDieselConnectionManager<AsyncPgConnection>>;

/// A single connection checked out of the pool.
///
/// Dereferences to [`AsyncPgConnection`], so repository traits implemented on
/// the connection are callable directly.
///
/// [`AsyncPgConnection`]: diesel_async::AsyncPgConnection
pub type PooledConnection =
    deadpool::managed::Object<AsyncDieselConnectionManager<AsyncPgConnection>>;

/// High-level database client that manages pooled connections.
///
/// This struct provides the main interface for database operations,
/// encapsulating connection pool management and configuration. Cloning is
/// cheap: all clones share the same pool.
#[derive(Clone)]
pub struct PgClient {
    inner: Arc<PgClientInner>,
}

/// Inner data for PgClient
struct PgClientInner {
    pool: ConnectionPool,
    config: PgConfig,
}

impl PgClient {
    /// Creates a new database client with the provided configuration.
    ///
    /// The pool is lazy: no connection is established until one is requested,
    /// so construction succeeds even when the database is unreachable.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool configuration is invalid.
    #[tracing::instrument(
        skip(config),
        target = TRACING_TARGET_CONNECTION,
        fields(database_url = %config.database_url_masked())
    )]
    pub fn new(config: PgConfig) -> PgResult<Self> {
        tracing::info!(target: TRACING_TARGET_CONNECTION, "Initializing database client");

        let manager = AsyncDieselConnectionManager::new(&config.postgres_url);

        let pool = Pool::builder(manager)
            .max_size(config.postgres_max_connections as usize)
            .wait_timeout(config.connection_timeout())
            .create_timeout(config.connection_timeout())
            .recycle_timeout(config.idle_timeout())
            .runtime(deadpool::Runtime::Tokio1)
            .build()
            .map_err(|e| {
                tracing::error!(target: TRACING_TARGET_CONNECTION, error = %e, "Failed to create connection pool");
                PgError::Unexpected(format!("Failed to build connection pool: {}", e).into())
            })?;

        Ok(Self {
            inner: Arc::new(PgClientInner { pool, config }),
        })
    }

    /// Checks a connection out of the pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool is exhausted, closed, or a new connection
    /// cannot be established.
    pub async fn get_connection(&self) -> PgResult<PooledConnection> {
        self.inner.pool.get().await.map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_CONNECTION,
                error = %e,
                "Failed to get connection from pool"
            );
            PgError::from(e)
        })
    }

    /// Returns the configuration the client was built from.
    #[inline]
    pub fn config(&self) -> &PgConfig {
        &self.inner.config
    }

    /// Closes the pool, releasing all connections.
    pub fn close(&self) {
        self.inner.pool.close();
    }
}

impl fmt::Debug for PgClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgClient")
            .field("database_url", &self.inner.config.database_url_masked())
            .field("max_connections", &self.inner.config.postgres_max_connections)
            .finish_non_exhaustive()
    }
}
