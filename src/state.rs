use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::auth::{AuthPolicy, CredentialStore, TokenIssuer};
use crate::config::AppConfig;

/// Shared, immutable request context. Cloned per request; holds no mutable state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub tokens: TokenIssuer,
    pub credentials: CredentialStore,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: &AppConfig) -> Self {
        let policy = AuthPolicy::from_config(&config.security);
        Self {
            tokens: TokenIssuer::new(&config.security.jwt_secret),
            credentials: CredentialStore::new(pool.clone(), policy),
            pool,
        }
    }
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for TokenIssuer {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}
