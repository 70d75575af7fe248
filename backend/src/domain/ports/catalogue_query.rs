//! Driving port for catalogue reads.

use async_trait::async_trait;

use crate::domain::{Category, Error, SubCategoryListing, SupportType};

/// Read-only catalogue use cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueQuery: Send + Sync {
    /// Categories ordered by name.
    async fn list_categories(&self) -> Result<Vec<Category>, Error>;

    /// Sub-categories with their parent category name.
    async fn list_sub_categories(&self) -> Result<Vec<SubCategoryListing>, Error>;

    /// Support types ordered by name.
    async fn list_support_types(&self) -> Result<Vec<SupportType>, Error>;
}
