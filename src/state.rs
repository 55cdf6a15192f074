//! Application state for Axum web framework.
//!
//! Contains shared services that are accessible across all request handlers.

use crate::db::AsyncDbPool;
use crate::repositories::Repositories;
use crate::services::Services;

/// Application state containing all shared services.
///
/// Cloning is cheap since services share their repositories behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
}

impl AppState {
    /// Creates a new AppState backed by a PostgreSQL connection pool.
    ///
    /// # Example
    /// ```ignore
    /// let pool = establish_async_connection_pool(&settings.database).await?;
    /// let state = AppState::new(pool);
    /// ```
    pub fn new(pool: AsyncDbPool) -> Self {
        Self::from_repositories(Repositories::new(pool))
    }

    pub fn from_repositories(repos: Repositories) -> Self {
        Self {
            services: Services::new(repos),
        }
    }
}
