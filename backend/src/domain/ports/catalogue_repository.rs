//! Driven port for categories, sub-categories, and support types.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Category, SubCategory, SubCategoryListing, SupportType};

use super::define_port_error;

define_port_error! {
    /// Errors raised by catalogue repository adapters.
    pub enum CatalogueRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "catalogue repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "catalogue repository query failed: {message}",
        /// An entry with the same name already exists in its scope.
        DuplicateName { name: String } => "an entry named {name} already exists",
        /// The parent category of a sub-category does not exist.
        UnknownCategory { category_id: Uuid } => "category {category_id} does not exist",
    }
}

/// Port for catalogue reference data.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueRepository: Send + Sync {
    /// All categories, ordered by name.
    async fn list_categories(&self) -> Result<Vec<Category>, CatalogueRepositoryError>;

    /// Find a category by id.
    async fn find_category(&self, id: Uuid) -> Result<Option<Category>, CatalogueRepositoryError>;

    /// Persist a category.
    async fn insert_category(&self, category: &Category) -> Result<(), CatalogueRepositoryError>;

    /// All sub-categories with their parent name, ordered by parent then
    /// name.
    async fn list_sub_categories(
        &self,
    ) -> Result<Vec<SubCategoryListing>, CatalogueRepositoryError>;

    /// Find a sub-category by id.
    async fn find_sub_category(
        &self,
        id: Uuid,
    ) -> Result<Option<SubCategory>, CatalogueRepositoryError>;

    /// Persist a sub-category.
    async fn insert_sub_category(
        &self,
        sub_category: &SubCategory,
    ) -> Result<(), CatalogueRepositoryError>;

    /// All support types, ordered by name.
    async fn list_support_types(&self) -> Result<Vec<SupportType>, CatalogueRepositoryError>;

    /// Find a support type by id.
    async fn find_support_type(
        &self,
        id: Uuid,
    ) -> Result<Option<SupportType>, CatalogueRepositoryError>;

    /// Persist a support type.
    async fn insert_support_type(
        &self,
        support_type: &SupportType,
    ) -> Result<(), CatalogueRepositoryError>;
}
