//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every REST path from the inbound layer together with
//! the schema wrappers in [`crate::inbound::http::schemas`], which describe
//! domain types without coupling them to utoipa. The document backs Swagger
//! UI in debug builds and is exported by `cargo run --bin openapi-dump`.

use utoipa::OpenApi;

use crate::inbound::http::catalogue::{CatalogueEntryRequestBody, CreateSubCategoryRequestBody};
use crate::inbound::http::deletion::DeleteResponseBody;
use crate::inbound::http::schemas::{
    CategorySchema, CategorySummarySchema, CreatedTeamSchema, ErrorCodeSchema, ErrorSchema,
    SubCategoryListingSchema, SubCategorySchema, SupportTypeSchema, TeamSchema,
    TicketListingSchema, TicketSchema, TicketStatusSchema, UserSummarySchema,
};
use crate::inbound::http::teams::{
    AddCategoriesRequestBody, AddMembersRequestBody, CreateTeamRequestBody, UserTeamResponseBody,
};
use crate::inbound::http::tickets::{
    AcceptTicketRequestBody, CreateTicketRequestBody, TransitionTicketRequestBody,
    UpdateTicketRequestBody,
};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Helpdesk API",
        description = "Support tickets, team assignment and the reference catalogue."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::teams::list_teams,
        crate::inbound::http::teams::create_team,
        crate::inbound::http::teams::list_unassigned_users,
        crate::inbound::http::teams::list_unassigned_categories,
        crate::inbound::http::teams::get_team,
        crate::inbound::http::teams::delete_team,
        crate::inbound::http::teams::get_team_roster,
        crate::inbound::http::teams::add_members,
        crate::inbound::http::teams::get_assigned_categories,
        crate::inbound::http::teams::add_categories,
        crate::inbound::http::teams::get_user_team,
        crate::inbound::http::tickets::list_tickets,
        crate::inbound::http::tickets::create_ticket,
        crate::inbound::http::tickets::get_ticket,
        crate::inbound::http::tickets::update_ticket,
        crate::inbound::http::tickets::accept_ticket,
        crate::inbound::http::tickets::transition_ticket,
        crate::inbound::http::tickets::delete_ticket,
        crate::inbound::http::catalogue::list_categories,
        crate::inbound::http::catalogue::create_category,
        crate::inbound::http::catalogue::list_sub_categories,
        crate::inbound::http::catalogue::create_sub_category,
        crate::inbound::http::catalogue::list_support_types,
        crate::inbound::http::catalogue::create_support_type,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        TeamSchema,
        UserSummarySchema,
        CategorySummarySchema,
        CreatedTeamSchema,
        TicketStatusSchema,
        TicketSchema,
        TicketListingSchema,
        CategorySchema,
        SubCategorySchema,
        SubCategoryListingSchema,
        SupportTypeSchema,
        DeleteResponseBody,
        CreateTeamRequestBody,
        AddMembersRequestBody,
        AddCategoriesRequestBody,
        UserTeamResponseBody,
        CreateTicketRequestBody,
        UpdateTicketRequestBody,
        AcceptTicketRequestBody,
        TransitionTicketRequestBody,
        CatalogueEntryRequestBody,
        CreateSubCategoryRequestBody,
    )),
    tags(
        (name = "teams", description = "Teams and their member and category assignments"),
        (name = "tickets", description = "Ticket lifecycle"),
        (name = "catalogue", description = "Categories, sub-categories and support types"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
