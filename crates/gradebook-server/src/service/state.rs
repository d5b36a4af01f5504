//! Application state and dependency injection.

use gradebook_postgres::PgClient;

use crate::service::{AuthGuard, AuthHasher, Result, ServiceConfig, SessionKeys};

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection). Handlers take
/// the individual services they need; nothing in the crate reaches for
/// ambient globals.
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Clone)]
pub struct ServiceState {
    pg_client: PgClient,
    auth_hasher: AuthHasher,
    auth_guard: AuthGuard,
    session_keys: SessionKeys,
}

impl ServiceState {
    /// Initializes application state from configuration.
    ///
    /// Builds the database client and loads the auth services. The database
    /// pool is lazy, so this succeeds without a reachable database.
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        let session_keys = config.load_session_keys()?;

        let service_state = Self {
            pg_client: config.connect_postgres()?,
            auth_hasher: config.create_password_hasher()?,
            auth_guard: AuthGuard::new(session_keys.clone()),
            session_keys,
        };

        Ok(service_state)
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(pg_client: PgClient);
impl_di!(auth_hasher: AuthHasher);
impl_di!(auth_guard: AuthGuard);
impl_di!(session_keys: SessionKeys);
