//! Service layer for business logic operations.
//!
//! Services encapsulate business logic and coordinate between
//! repositories and handlers.

mod villa_service;

pub use villa_service::VillaService;

use crate::repositories::Repositories;

/// Aggregates all services for convenient access.
///
/// Cloning is cheap since repositories are shared behind `Arc`.
#[derive(Clone)]
pub struct Services {
    pub villas: VillaService,
}

impl Services {
    pub fn new(repos: Repositories) -> Self {
        Self {
            villas: VillaService::new(repos.villas),
        }
    }
}
