//! Villa service for business logic operations.
//!
//! Sits between the handlers and `VillaRepository`: it turns missing rows
//! into `NotFound`, enforces case-insensitive name uniqueness and stamps
//! timestamps.

use std::sync::Arc;

use jiff::Timestamp;

use crate::error::{AppError, AppResult};
use crate::models::{NewVilla, Villa, VillaChanges, VillaInput};
use crate::repositories::{VillaFilter, VillaRepository};

#[derive(Clone)]
pub struct VillaService {
    repo: Arc<dyn VillaRepository>,
}

impl VillaService {
    pub fn new(repo: Arc<dyn VillaRepository>) -> Self {
        Self { repo }
    }

    /// Lists all villas ordered by id.
    pub async fn list_villas(&self) -> AppResult<Vec<Villa>> {
        self.repo.get_all().await
    }

    /// Gets a villa by id, or `NotFound`.
    pub async fn get_villa(&self, id: i32) -> AppResult<Villa> {
        self.repo
            .get(VillaFilter::Id(id))
            .await?
            .ok_or_else(|| AppError::villa_not_found(id))
    }

    /// Creates a villa after checking that no other villa has the same name
    /// ignoring case.
    ///
    /// The unique index on `lower(name)` backs this check when two creates
    /// race; its violation converts to the same `Duplicate` error.
    pub async fn create_villa(&self, input: VillaInput) -> AppResult<Villa> {
        self.ensure_name_available(&input.name, None).await?;

        let villa = self.repo.create(NewVilla::new(input, Timestamp::now())).await?;
        tracing::info!(villa_id = villa.id, villa_name = %villa.name, "Villa created");
        Ok(villa)
    }

    /// Replaces every descriptive field of villa `id`.
    ///
    /// `created_at` is kept and `updated_at` is restamped.
    pub async fn update_villa(&self, id: i32, input: VillaInput) -> AppResult<Villa> {
        self.get_villa(id).await?;
        self.ensure_name_available(&input.name, Some(id)).await?;

        let villa = self
            .repo
            .update(id, VillaChanges::new(input, Timestamp::now()))
            .await?
            .ok_or_else(|| AppError::villa_not_found(id))?;
        tracing::info!(villa_id = villa.id, "Villa updated");
        Ok(villa)
    }

    /// Deletes villa `id`, or returns `NotFound` when it does not exist.
    pub async fn delete_villa(&self, id: i32) -> AppResult<()> {
        self.get_villa(id).await?;

        if self.repo.remove(id).await? == 0 {
            return Err(AppError::villa_not_found(id));
        }
        tracing::info!(villa_id = id, "Villa deleted");
        Ok(())
    }

    /// Checks that the backing store answers.
    pub async fn health_check(&self) -> AppResult<()> {
        self.repo.ping().await
    }

    async fn ensure_name_available(&self, name: &str, except_id: Option<i32>) -> AppResult<()> {
        let existing = self
            .repo
            .get(VillaFilter::NameIgnoreCase(name.to_string()))
            .await?;

        match existing {
            Some(villa) if Some(villa.id) != except_id => Err(AppError::Duplicate {
                entity: "villa".to_string(),
                field: "name".to_string(),
                value: name.to_string(),
            }),
            _ => Ok(()),
        }
    }
}
