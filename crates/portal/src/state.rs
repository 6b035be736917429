//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::PortalConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the database pool and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: PortalConfig,
    pool: SqlitePool,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Portal configuration
    /// * `pool` - `SQLite` connection pool
    #[must_use]
    pub fn new(config: PortalConfig, pool: SqlitePool) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, pool }),
        }
    }

    /// Get a reference to the portal configuration.
    #[must_use]
    pub fn config(&self) -> &PortalConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }
}
