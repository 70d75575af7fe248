//! Reference catalogue HTTP handlers.
//!
//! ```text
//! GET  /api/v1/categories
//! POST /api/v1/categories
//! GET  /api/v1/sub-categories
//! POST /api/v1/sub-categories
//! GET  /api/v1/support-types
//! POST /api/v1/support-types
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::CatalogueEntryRequest;
use crate::domain::{Category, SubCategoryListing, SupportType};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{
    CategorySchema, ErrorSchema, SubCategoryListingSchema, SubCategorySchema, SupportTypeSchema,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_uuid};

/// Name and optional description of a category or support type.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogueEntryRequestBody {
    #[schema(example = "DNS")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<CatalogueEntryRequestBody> for CatalogueEntryRequest {
    fn from(body: CatalogueEntryRequestBody) -> Self {
        Self {
            name: body.name,
            description: body.description,
        }
    }
}

/// Request payload for adding a sub-category.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubCategoryRequestBody {
    #[schema(format = "uuid")]
    pub category_id: String,
    #[schema(example = "Resolution failures")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// List categories ordered by name.
#[utoipa::path(
    get,
    path = "/api/v1/categories",
    responses(
        (status = 200, description = "Categories", body = [CategorySchema]),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "listCategories"
)]
#[get("/categories")]
pub async fn list_categories(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Category>>> {
    Ok(web::Json(state.catalogue_query.list_categories().await?))
}

/// Add a category.
#[utoipa::path(
    post,
    path = "/api/v1/categories",
    request_body = CatalogueEntryRequestBody,
    responses(
        (status = 201, description = "Category created", body = CategorySchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Name already taken", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "createCategory"
)]
#[post("/categories")]
pub async fn create_category(
    state: web::Data<HttpState>,
    payload: web::Json<CatalogueEntryRequestBody>,
) -> ApiResult<HttpResponse> {
    let category = state
        .catalogue
        .create_category(payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(category))
}

/// List sub-categories with their parent category name.
#[utoipa::path(
    get,
    path = "/api/v1/sub-categories",
    responses(
        (status = 200, description = "Sub-categories", body = [SubCategoryListingSchema]),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "listSubCategories"
)]
#[get("/sub-categories")]
pub async fn list_sub_categories(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<SubCategoryListing>>> {
    Ok(web::Json(state.catalogue_query.list_sub_categories().await?))
}

/// Add a sub-category under an existing category.
#[utoipa::path(
    post,
    path = "/api/v1/sub-categories",
    request_body = CreateSubCategoryRequestBody,
    responses(
        (status = 201, description = "Sub-category created", body = SubCategorySchema),
        (status = 400, description = "Invalid request or unknown category", body = ErrorSchema),
        (status = 409, description = "Name already taken in this category", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "createSubCategory"
)]
#[post("/sub-categories")]
pub async fn create_sub_category(
    state: web::Data<HttpState>,
    payload: web::Json<CreateSubCategoryRequestBody>,
) -> ApiResult<HttpResponse> {
    let CreateSubCategoryRequestBody {
        category_id,
        name,
        description,
    } = payload.into_inner();
    let category_id = parse_uuid(category_id, FieldName::new("categoryId"))?;
    let sub_category = state
        .catalogue
        .create_sub_category(category_id, CatalogueEntryRequest { name, description })
        .await?;
    Ok(HttpResponse::Created().json(sub_category))
}

/// List support types ordered by name.
#[utoipa::path(
    get,
    path = "/api/v1/support-types",
    responses(
        (status = 200, description = "Support types", body = [SupportTypeSchema]),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "listSupportTypes"
)]
#[get("/support-types")]
pub async fn list_support_types(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<SupportType>>> {
    Ok(web::Json(state.catalogue_query.list_support_types().await?))
}

/// Add a support type.
#[utoipa::path(
    post,
    path = "/api/v1/support-types",
    request_body = CatalogueEntryRequestBody,
    responses(
        (status = 201, description = "Support type created", body = SupportTypeSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Name already taken", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "createSupportType"
)]
#[post("/support-types")]
pub async fn create_support_type(
    state: web::Data<HttpState>,
    payload: web::Json<CatalogueEntryRequestBody>,
) -> ApiResult<HttpResponse> {
    let support_type = state
        .catalogue
        .create_support_type(payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(support_type))
}
