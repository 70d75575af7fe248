//! PostgreSQL-backed `CatalogueRepository` implementation.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{CatalogueRepository, CatalogueRepositoryError};
use crate::domain::{Category, SubCategory, SubCategoryListing, SupportType};

use super::error_mapping::{DieselFailure, classify_diesel_error, pool_error_message};
use super::models::{CategoryRow, SubCategoryRow, SupportTypeRow};
use super::pool::{DbPool, PoolError};
use super::schema::{categories, sub_categories, support_types};

/// Diesel-backed implementation of the [`CatalogueRepository`] port.
#[derive(Clone)]
pub struct DieselCatalogueRepository {
    pool: DbPool,
}

impl DieselCatalogueRepository {
    /// Create a repository over the given pool.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use helpdesk::outbound::persistence::{DbPool, DieselCatalogueRepository, PoolConfig};
    ///
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let pool = DbPool::new(PoolConfig::new("postgres://localhost/helpdesk")).await?;
    /// let _repo = DieselCatalogueRepository::new(pool);
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CatalogueRepositoryError {
    CatalogueRepositoryError::connection(pool_error_message(error))
}

fn map_read_error(error: diesel::result::Error) -> CatalogueRepositoryError {
    map_write_error(error, "")
}

/// Map write failures; unique violations report `name` as the duplicate.
fn map_write_error(error: diesel::result::Error, name: &str) -> CatalogueRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::Connection => {
            CatalogueRepositoryError::connection("database connection error")
        }
        DieselFailure::UniqueViolation { .. } => CatalogueRepositoryError::duplicate_name(name),
        DieselFailure::ForeignKeyViolation { .. } => {
            CatalogueRepositoryError::query("unexpected foreign key violation")
        }
        DieselFailure::Query(message) => CatalogueRepositoryError::query(message),
    }
}

#[async_trait]
impl CatalogueRepository for DieselCatalogueRepository {
    async fn list_categories(&self) -> Result<Vec<Category>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CategoryRow> = categories::table
            .order(categories::name.asc())
            .select(CategoryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn find_category(&self, id: Uuid) -> Result<Option<Category>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        categories::table
            .filter(categories::id.eq(id))
            .select(CategoryRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map(|row| row.map(Category::from))
            .map_err(map_read_error)
    }

    async fn insert_category(&self, category: &Category) -> Result<(), CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(categories::table)
            .values(&CategoryRow::from(category))
            .execute(&mut conn)
            .await
            .map_err(|err| map_write_error(err, &category.name))?;
        Ok(())
    }

    async fn list_sub_categories(
        &self,
    ) -> Result<Vec<SubCategoryListing>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(SubCategoryRow, String)> = sub_categories::table
            .inner_join(categories::table)
            .order((categories::name.asc(), sub_categories::name.asc()))
            .select((SubCategoryRow::as_select(), categories::name))
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;
        Ok(rows
            .into_iter()
            .map(|(row, category)| row.into_listing(category))
            .collect())
    }

    async fn find_sub_category(
        &self,
        id: Uuid,
    ) -> Result<Option<SubCategory>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        sub_categories::table
            .filter(sub_categories::id.eq(id))
            .select(SubCategoryRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map(|row| row.map(SubCategory::from))
            .map_err(map_read_error)
    }

    async fn insert_sub_category(
        &self,
        sub_category: &SubCategory,
    ) -> Result<(), CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(sub_categories::table)
            .values(&SubCategoryRow::from(sub_category))
            .execute(&mut conn)
            .await
            .map_err(|err| match classify_diesel_error(err) {
                DieselFailure::ForeignKeyViolation { .. } => {
                    CatalogueRepositoryError::unknown_category(sub_category.category_id)
                }
                DieselFailure::UniqueViolation { .. } => {
                    CatalogueRepositoryError::duplicate_name(sub_category.name.clone())
                }
                DieselFailure::Connection => {
                    CatalogueRepositoryError::connection("database connection error")
                }
                DieselFailure::Query(message) => CatalogueRepositoryError::query(message),
            })?;
        Ok(())
    }

    async fn list_support_types(&self) -> Result<Vec<SupportType>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<SupportTypeRow> = support_types::table
            .order(support_types::name.asc())
            .select(SupportTypeRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;
        Ok(rows.into_iter().map(SupportType::from).collect())
    }

    async fn find_support_type(
        &self,
        id: Uuid,
    ) -> Result<Option<SupportType>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        support_types::table
            .filter(support_types::id.eq(id))
            .select(SupportTypeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map(|row| row.map(SupportType::from))
            .map_err(map_read_error)
    }

    async fn insert_support_type(
        &self,
        support_type: &SupportType,
    ) -> Result<(), CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(support_types::table)
            .values(&SupportTypeRow::from(support_type))
            .execute(&mut conn)
            .await
            .map_err(|err| map_write_error(err, &support_type.name))?;
        Ok(())
    }
}
