//! Application state shared across all request handlers.

use crate::config::runtime::SharedConfig;
use evbook_core::framework::DatabaseProcessor;
use evbook_core::identity::TokenService;
use sqlx::PgPool;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: PgPool,
    /// Runtime configuration (can be reloaded via SIGHUP).
    pub config: SharedConfig,
}

impl AppState {
    /// Create a new AppState with the given database pool and configuration.
    pub fn new(db: PgPool, config: SharedConfig) -> Self {
        Self { db, config }
    }

    /// Repository handle for one request.
    pub fn processor(&self) -> DatabaseProcessor {
        DatabaseProcessor::new(self.db.clone())
    }

    /// Token service built from the current auth configuration.
    pub async fn token_service(&self) -> TokenService {
        self.config.auth.read().await.token_service()
    }
}
