//! Catalogue service for categories, sub-categories, and support types.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::domain::ports::{
    CatalogueCommand, CatalogueEntryRequest, CatalogueQuery, CatalogueRepository,
    CatalogueRepositoryError,
};
use crate::domain::{Category, EntityName, Error, SubCategory, SubCategoryListing, SupportType};

/// Reference data use cases.
#[derive(Clone)]
pub struct CatalogueService<C> {
    catalogue: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<C> CatalogueService<C> {
    /// Create a service over the catalogue repository.
    pub fn new(catalogue: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self { catalogue, clock }
    }
}

fn map_catalogue_error(error: CatalogueRepositoryError) -> Error {
    match error {
        CatalogueRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("catalogue repository unavailable: {message}"))
        }
        CatalogueRepositoryError::Query { message } => {
            Error::internal(format!("catalogue repository error: {message}"))
        }
        CatalogueRepositoryError::DuplicateName { name } => {
            Error::conflict(format!("an entry named {name} already exists")).with_details(json!({
                "field": "name",
                "value": name,
                "code": "duplicate_name",
            }))
        }
        CatalogueRepositoryError::UnknownCategory { category_id } => {
            unknown_category(category_id)
        }
    }
}

fn unknown_category(category_id: Uuid) -> Error {
    Error::invalid_request(format!("category {category_id} does not exist")).with_details(json!({
        "field": "categoryId",
        "value": category_id,
        "code": "unknown_reference",
    }))
}

#[async_trait]
impl<C> CatalogueCommand for CatalogueService<C>
where
    C: CatalogueRepository,
{
    async fn create_category(&self, request: CatalogueEntryRequest) -> Result<Category, Error> {
        let name = EntityName::new(&request.name).map_err(|err| err.into_domain_error())?;
        let category = Category::new(name, request.description, self.clock.utc());
        self.catalogue
            .insert_category(&category)
            .await
            .map_err(map_catalogue_error)?;
        info!(category_id = %category.id, name = %category.name, "category created");
        Ok(category)
    }

    async fn create_sub_category(
        &self,
        category_id: Uuid,
        request: CatalogueEntryRequest,
    ) -> Result<SubCategory, Error> {
        let name = EntityName::new(&request.name).map_err(|err| err.into_domain_error())?;
        if self
            .catalogue
            .find_category(category_id)
            .await
            .map_err(map_catalogue_error)?
            .is_none()
        {
            return Err(unknown_category(category_id));
        }

        let sub_category =
            SubCategory::new(category_id, name, request.description, self.clock.utc());
        self.catalogue
            .insert_sub_category(&sub_category)
            .await
            .map_err(map_catalogue_error)?;
        info!(
            sub_category_id = %sub_category.id,
            %category_id,
            "sub-category created"
        );
        Ok(sub_category)
    }

    async fn create_support_type(
        &self,
        request: CatalogueEntryRequest,
    ) -> Result<SupportType, Error> {
        let name = EntityName::new(&request.name).map_err(|err| err.into_domain_error())?;
        let support_type = SupportType::new(name, request.description, self.clock.utc());
        self.catalogue
            .insert_support_type(&support_type)
            .await
            .map_err(map_catalogue_error)?;
        info!(support_type_id = %support_type.id, "support type created");
        Ok(support_type)
    }
}

#[async_trait]
impl<C> CatalogueQuery for CatalogueService<C>
where
    C: CatalogueRepository,
{
    async fn list_categories(&self) -> Result<Vec<Category>, Error> {
        self.catalogue
            .list_categories()
            .await
            .map_err(map_catalogue_error)
    }

    async fn list_sub_categories(&self) -> Result<Vec<SubCategoryListing>, Error> {
        self.catalogue
            .list_sub_categories()
            .await
            .map_err(map_catalogue_error)
    }

    async fn list_support_types(&self) -> Result<Vec<SupportType>, Error> {
        self.catalogue
            .list_support_types()
            .await
            .map_err(map_catalogue_error)
    }
}
