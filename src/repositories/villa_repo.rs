//! Villa repository for async database operations.
//!
//! Provides CRUD operations for the villas table using diesel_async.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::Text;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::{AppResult, DatabaseErrorConverter};
use crate::models::{NewVilla, Villa, VillaChanges};
use crate::schema::villas;

define_sql_function!(fn lower(x: Text) -> Text);

/// Selection criteria for a single villa lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VillaFilter {
    Id(i32),
    /// Matches names case-insensitively, the same way the unique index does
    NameIgnoreCase(String),
}

/// Both sides go through Postgres `lower()` so the lookup folds case
/// exactly like `villas_name_key`.
fn filtered(filter: VillaFilter) -> villas::BoxedQuery<'static, Pg> {
    let query = villas::table.into_boxed();
    match filter {
        VillaFilter::Id(villa_id) => query.filter(villas::id.eq(villa_id)),
        VillaFilter::NameIgnoreCase(villa_name) => {
            query.filter(lower(villas::name).eq(lower(villa_name)))
        }
    }
}

/// Storage operations for villas.
#[async_trait]
pub trait VillaRepository: Send + Sync {
    /// All villas ordered by id.
    async fn get_all(&self) -> AppResult<Vec<Villa>>;

    /// First villa matching `filter`, if any.
    async fn get(&self, filter: VillaFilter) -> AppResult<Option<Villa>>;

    /// Inserts a villa and returns it with its assigned id.
    async fn create(&self, new_villa: NewVilla) -> AppResult<Villa>;

    /// Replaces the mutable columns of villa `id`; `None` when it does not exist.
    async fn update(&self, id: i32, changes: VillaChanges) -> AppResult<Option<Villa>>;

    /// Deletes villa `id` and returns the number of rows removed.
    async fn remove(&self, id: i32) -> AppResult<usize>;

    /// Round-trips to the store.
    async fn ping(&self) -> AppResult<()>;
}

/// PostgreSQL-backed villa repository.
///
/// `AsyncDbPool` is reference counted, so cloning the repository is cheap.
#[derive(Clone)]
pub struct PgVillaRepository {
    pool: AsyncDbPool,
}

impl PgVillaRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VillaRepository for PgVillaRepository {
    async fn get_all(&self) -> AppResult<Vec<Villa>> {
        let mut conn = self.pool.get().await?;

        villas::table
            .order(villas::id.asc())
            .select(Villa::as_select())
            .load(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "list villas"))
    }

    async fn get(&self, filter: VillaFilter) -> AppResult<Option<Villa>> {
        let mut conn = self.pool.get().await?;

        filtered(filter)
            .select(Villa::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "find villa"))
    }

    async fn create(&self, new_villa: NewVilla) -> AppResult<Villa> {
        let mut conn = self.pool.get().await?;

        diesel::insert_into(villas::table)
            .values(&new_villa)
            .returning(Villa::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "create villa"))
    }

    async fn update(&self, villa_id: i32, changes: VillaChanges) -> AppResult<Option<Villa>> {
        let mut conn = self.pool.get().await?;

        diesel::update(villas::table.find(villa_id))
            .set(&changes)
            .returning(Villa::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "update villa"))
    }

    async fn remove(&self, villa_id: i32) -> AppResult<usize> {
        let mut conn = self.pool.get().await?;

        diesel::delete(villas::table.find(villa_id))
            .execute(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "delete villa"))
    }

    async fn ping(&self) -> AppResult<()> {
        let mut conn = self.pool.get().await?;

        diesel::sql_query("SELECT 1")
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "ping database"))
    }
}
