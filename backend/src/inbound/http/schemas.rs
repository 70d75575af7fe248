//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.
//!
//! The schema wrappers mirror the serialised shape of their domain types but
//! live in the inbound adapter layer where framework concerns belong.

#![expect(
    dead_code,
    reason = "Schema wrappers are only read by utoipa during OpenAPI generation"
)]

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed, fails validation, or names a missing record.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request collides with existing state.
    #[schema(rename = "conflict")]
    Conflict,
    /// A backing store could not be reached.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "conflict")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "user is already assigned to a team")]
    message: String,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details such as the offending field.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::Team`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Team, rename_all = "camelCase")]
pub struct TeamSchema {
    #[schema(format = "uuid")]
    id: String,
    #[schema(example = "Network")]
    name: String,
    #[schema(format = "date-time")]
    created_at: String,
    #[schema(format = "date-time")]
    updated_at: String,
}

/// OpenAPI schema for [`crate::domain::UserSummary`].
#[derive(ToSchema)]
#[schema(as = crate::domain::UserSummary)]
pub struct UserSummarySchema {
    #[schema(format = "uuid")]
    id: String,
    #[schema(example = "Ada Lovelace")]
    name: String,
    /// Avatar URL.
    image: Option<String>,
}

/// OpenAPI schema for [`crate::domain::CategorySummary`].
#[derive(ToSchema)]
#[schema(as = crate::domain::CategorySummary)]
pub struct CategorySummarySchema {
    #[schema(format = "uuid")]
    id: String,
    #[schema(example = "DNS")]
    name: String,
}

/// OpenAPI schema for [`crate::domain::CreatedTeam`].
#[derive(ToSchema)]
#[schema(as = crate::domain::CreatedTeam)]
pub struct CreatedTeamSchema {
    team: TeamSchema,
    /// Members placed on the team, ordered by name.
    roster: Vec<UserSummarySchema>,
}

/// OpenAPI schema for [`crate::domain::TicketStatus`].
#[derive(ToSchema)]
#[schema(as = crate::domain::TicketStatus)]
pub enum TicketStatusSchema {
    #[schema(rename = "open")]
    Open,
    #[schema(rename = "ongoing")]
    Ongoing,
    #[schema(rename = "resolved")]
    Resolved,
    #[schema(rename = "closed")]
    Closed,
}

/// OpenAPI schema for [`crate::domain::Ticket`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Ticket, rename_all = "camelCase")]
pub struct TicketSchema {
    #[schema(format = "uuid")]
    id: String,
    #[schema(format = "uuid")]
    requestor_id: String,
    /// Support user who accepted the ticket.
    #[schema(format = "uuid")]
    assigned_id: Option<String>,
    #[schema(format = "uuid")]
    category_id: String,
    #[schema(format = "uuid")]
    sub_category_id: String,
    #[schema(format = "uuid")]
    support_type_id: String,
    #[schema(example = "VPN drops every ten minutes")]
    details: String,
    status: TicketStatusSchema,
    #[schema(format = "date-time")]
    created_at: String,
    #[schema(format = "date-time")]
    updated_at: String,
}

/// OpenAPI schema for [`crate::domain::TicketListing`].
#[derive(ToSchema)]
#[schema(as = crate::domain::TicketListing, rename_all = "camelCase")]
pub struct TicketListingSchema {
    #[schema(format = "uuid")]
    id: String,
    /// Requester display name.
    requested_by: String,
    requested_by_avatar: Option<String>,
    /// Assignee display name; absent until accepted.
    assigned_to: Option<String>,
    assigned_to_avatar: Option<String>,
    details: String,
    status: TicketStatusSchema,
    #[schema(format = "date-time")]
    created_at: String,
    #[schema(format = "date-time")]
    updated_at: String,
}

/// OpenAPI schema for [`crate::domain::Category`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Category, rename_all = "camelCase")]
pub struct CategorySchema {
    #[schema(format = "uuid")]
    id: String,
    #[schema(example = "DNS")]
    name: String,
    description: Option<String>,
    #[schema(format = "date-time")]
    created_at: String,
    #[schema(format = "date-time")]
    updated_at: String,
}

/// OpenAPI schema for [`crate::domain::SubCategory`].
#[derive(ToSchema)]
#[schema(as = crate::domain::SubCategory, rename_all = "camelCase")]
pub struct SubCategorySchema {
    #[schema(format = "uuid")]
    id: String,
    #[schema(format = "uuid")]
    category_id: String,
    #[schema(example = "Resolution failures")]
    name: String,
    description: Option<String>,
    #[schema(format = "date-time")]
    created_at: String,
    #[schema(format = "date-time")]
    updated_at: String,
}

/// OpenAPI schema for [`crate::domain::SubCategoryListing`].
#[derive(ToSchema)]
#[schema(as = crate::domain::SubCategoryListing, rename_all = "camelCase")]
pub struct SubCategoryListingSchema {
    #[schema(format = "uuid")]
    id: String,
    name: String,
    /// Parent category name.
    category: String,
    description: Option<String>,
    #[schema(format = "date-time")]
    created_at: String,
    #[schema(format = "date-time")]
    updated_at: String,
}

/// OpenAPI schema for [`crate::domain::SupportType`].
#[derive(ToSchema)]
#[schema(as = crate::domain::SupportType, rename_all = "camelCase")]
pub struct SupportTypeSchema {
    #[schema(format = "uuid")]
    id: String,
    #[schema(example = "Hardware")]
    name: String,
    description: Option<String>,
    #[schema(format = "date-time")]
    created_at: String,
}
