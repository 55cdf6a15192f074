//! In-memory villa repository used by service and handler tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};
use crate::models::{NewVilla, Villa, VillaChanges};
use crate::repositories::{VillaFilter, VillaRepository};

#[derive(Default)]
struct Store {
    rows: BTreeMap<i32, Villa>,
    last_id: i32,
}

/// Mirrors the PostgreSQL repository, including the case-insensitive unique
/// index on `name`.
#[derive(Default)]
pub struct InMemoryVillaRepository {
    store: RwLock<Store>,
    unavailable: AtomicBool,
}

impl InMemoryVillaRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail like a lost database connection.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.rows.len()
    }

    fn check_available(&self) -> AppResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::Database {
                operation: "in-memory store".to_string(),
                source: anyhow::anyhow!("store is unavailable"),
            });
        }
        Ok(())
    }

    fn ensure_unique_name(store: &Store, name: &str, except_id: Option<i32>) -> AppResult<()> {
        let lowered = name.to_lowercase();
        let taken = store
            .rows
            .values()
            .any(|villa| Some(villa.id) != except_id && villa.name.to_lowercase() == lowered);

        if taken {
            return Err(AppError::Duplicate {
                entity: "villa".to_string(),
                field: "name".to_string(),
                value: lowered,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl VillaRepository for InMemoryVillaRepository {
    async fn get_all(&self) -> AppResult<Vec<Villa>> {
        self.check_available()?;
        Ok(self.store.read().await.rows.values().cloned().collect())
    }

    async fn get(&self, filter: VillaFilter) -> AppResult<Option<Villa>> {
        self.check_available()?;
        let store = self.store.read().await;

        let found = match filter {
            VillaFilter::Id(id) => store.rows.get(&id).cloned(),
            VillaFilter::NameIgnoreCase(name) => {
                let lowered = name.to_lowercase();
                store
                    .rows
                    .values()
                    .find(|villa| villa.name.to_lowercase() == lowered)
                    .cloned()
            }
        };
        Ok(found)
    }

    async fn create(&self, new_villa: NewVilla) -> AppResult<Villa> {
        self.check_available()?;
        let mut store = self.store.write().await;
        Self::ensure_unique_name(&store, &new_villa.name, None)?;

        store.last_id += 1;
        let villa = Villa {
            id: store.last_id,
            name: new_villa.name,
            details: new_villa.details,
            rate: new_villa.rate,
            occupancy: new_villa.occupancy,
            square_meters: new_villa.square_meters,
            image_url: new_villa.image_url,
            amenity: new_villa.amenity,
            created_at: new_villa.created_at,
            updated_at: new_villa.updated_at,
        };
        store.rows.insert(villa.id, villa.clone());
        Ok(villa)
    }

    async fn update(&self, id: i32, changes: VillaChanges) -> AppResult<Option<Villa>> {
        self.check_available()?;
        let mut store = self.store.write().await;
        if !store.rows.contains_key(&id) {
            return Ok(None);
        }
        Self::ensure_unique_name(&store, &changes.name, Some(id))?;

        let Some(villa) = store.rows.get_mut(&id) else {
            return Ok(None);
        };
        villa.name = changes.name;
        villa.details = changes.details;
        villa.rate = changes.rate;
        villa.occupancy = changes.occupancy;
        villa.square_meters = changes.square_meters;
        villa.image_url = changes.image_url;
        villa.amenity = changes.amenity;
        villa.updated_at = changes.updated_at;
        Ok(Some(villa.clone()))
    }

    async fn remove(&self, id: i32) -> AppResult<usize> {
        self.check_available()?;
        let removed = self.store.write().await.rows.remove(&id);
        Ok(usize::from(removed.is_some()))
    }

    async fn ping(&self) -> AppResult<()> {
        self.check_available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VillaInput;
    use jiff::Timestamp;

    fn input(name: &str) -> VillaInput {
        VillaInput {
            name: name.to_string(),
            details: String::new(),
            rate: 100.0,
            occupancy: 2,
            square_meters: 50.0,
            image_url: String::new(),
            amenity: String::new(),
        }
    }

    #[tokio::test]
    async fn test_ids_are_assigned_sequentially() {
        let repo = InMemoryVillaRepository::new();
        let now = Timestamp::now();

        let first = repo.create(NewVilla::new(input("One"), now)).await.unwrap();
        let second = repo.create(NewVilla::new(input("Two"), now)).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn test_duplicate_name_is_rejected_case_insensitively() {
        let repo = InMemoryVillaRepository::new();
        let now = Timestamp::now();
        repo.create(NewVilla::new(input("Beach House"), now)).await.unwrap();

        let result = repo.create(NewVilla::new(input("BEACH house"), now)).await;

        assert!(matches!(result, Err(AppError::Duplicate { .. })));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_update_missing_returns_none() {
        let repo = InMemoryVillaRepository::new();
        let changes = VillaChanges::new(input("Ghost"), Timestamp::now());

        assert!(repo.update(7, changes).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unavailable_store_fails() {
        let repo = InMemoryVillaRepository::new();
        repo.set_unavailable(true);

        assert!(matches!(repo.get_all().await, Err(AppError::Database { .. })));
        assert!(repo.ping().await.is_err());
    }
}
