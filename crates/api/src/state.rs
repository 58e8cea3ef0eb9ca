//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ApiConfig;
use crate::db::Store;
use crate::db::postgres::PgStore;
use crate::graphql::{ApiSchema, build_schema};
use crate::services::auth::{AuthService, TokenSigner};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the database pool and the executable schema.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    pool: PgPool,
    schema: ApiSchema,
    signer: TokenSigner,
}

impl AppState {
    /// Create a new application state backed by the `PostgreSQL` store.
    #[must_use]
    pub fn new(config: ApiConfig, pool: PgPool) -> Self {
        let store: Arc<dyn Store> = Arc::new(PgStore::new(pool.clone()));
        let signer = TokenSigner::new(&config.jwt_secret, config.token_ttl_hours);
        let auth = AuthService::new(Arc::clone(&store), signer.clone(), config.password_cost);
        let schema = build_schema(store, auth);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                schema,
                signer,
            }),
        }
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the executable schema.
    #[must_use]
    pub fn schema(&self) -> &ApiSchema {
        &self.inner.schema
    }

    /// Get a reference to the token signer used to resolve identities.
    #[must_use]
    pub fn signer(&self) -> &TokenSigner {
        &self.inner.signer
    }
}
