//! Repository layer for data access operations.

#[cfg(test)]
mod memory_repo;
mod villa_repo;

#[cfg(test)]
pub use memory_repo::InMemoryVillaRepository;
pub use villa_repo::{PgVillaRepository, VillaFilter, VillaRepository};

use std::sync::Arc;

use crate::db::AsyncDbPool;

/// Aggregates all repositories for convenient access.
#[derive(Clone)]
pub struct Repositories {
    pub villas: Arc<dyn VillaRepository>,
}

impl Repositories {
    /// Creates PostgreSQL-backed repositories sharing `pool`.
    pub fn new(pool: AsyncDbPool) -> Self {
        Self {
            villas: Arc::new(PgVillaRepository::new(pool)),
        }
    }

    /// Wraps an existing villa repository, e.g. an in-memory one.
    pub fn with_villas(villas: Arc<dyn VillaRepository>) -> Self {
        Self { villas }
    }
}
