//! Driving port for catalogue writes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Category, Error, SubCategory, SupportType};

/// Name and optional description shared by every catalogue entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogueEntryRequest {
    /// Entry name; trimmed and required.
    pub name: String,
    /// Free-form description; blank values are dropped.
    #[serde(default)]
    pub description: Option<String>,
}

/// Use-case port for adding reference data.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueCommand: Send + Sync {
    /// Add a category.
    async fn create_category(&self, request: CatalogueEntryRequest) -> Result<Category, Error>;

    /// Add a sub-category under `category_id`.
    ///
    /// # Errors
    ///
    /// Returns `invalid_request` when the parent category does not exist.
    async fn create_sub_category(
        &self,
        category_id: Uuid,
        request: CatalogueEntryRequest,
    ) -> Result<SubCategory, Error>;

    /// Add a support type.
    async fn create_support_type(
        &self,
        request: CatalogueEntryRequest,
    ) -> Result<SupportType, Error>;
}
