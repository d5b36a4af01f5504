//! Service configuration.

#[cfg(any(test, feature = "config"))]
use clap::Args;
use gradebook_postgres::{PgClient, PgConfig};
use serde::{Deserialize, Serialize};

use crate::service::{AuthHasher, Result, ServiceError, SessionKeys, SessionKeysConfig};

/// Complete configuration for the API service.
///
/// Bundles the persistence and session-key configuration; the CLI flattens
/// this into its argument parser.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "config"), derive(Args))]
pub struct ServiceConfig {
    /// PostgreSQL connection and pool settings.
    #[cfg_attr(any(test, feature = "config"), command(flatten))]
    #[serde(default)]
    pub postgres: PgConfig,

    /// Session token signing settings.
    #[cfg_attr(any(test, feature = "config"), command(flatten))]
    #[serde(default)]
    pub session_keys: SessionKeysConfig,
}

impl ServiceConfig {
    /// Builds the database client.
    ///
    /// The underlying pool is lazy; this does not require the database to be
    /// reachable.
    pub fn connect_postgres(&self) -> Result<PgClient> {
        self.postgres
            .create_client()
            .map_err(|e| ServiceError::config(format!("database client: {e}")))
    }

    /// Builds the password hashing service.
    pub fn create_password_hasher(&self) -> Result<AuthHasher> {
        AuthHasher::new()
    }

    /// Loads the session signing keys.
    pub fn load_session_keys(&self) -> Result<SessionKeys> {
        SessionKeys::from_config(&self.session_keys)
    }
}
