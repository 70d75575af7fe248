//! Ticket lifecycle HTTP handlers.
//!
//! ```text
//! GET    /api/v1/tickets
//! POST   /api/v1/tickets
//! GET    /api/v1/tickets/{ticket_id}
//! PATCH  /api/v1/tickets/{ticket_id}
//! DELETE /api/v1/tickets/{ticket_id}
//! PATCH  /api/v1/tickets/{ticket_id}/accept
//! PATCH  /api/v1/tickets/{ticket_id}/status
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Error, Ticket, TicketDraft, TicketListing, TicketPatch, TicketStatus};
use crate::inbound::http::ApiResult;
use crate::inbound::http::deletion::DeleteResponseBody;
use crate::inbound::http::schemas::{ErrorSchema, TicketListingSchema, TicketSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_optional_uuid, parse_status, parse_user_id, parse_uuid,
};

/// Path parameters naming a ticket.
#[derive(Debug, Deserialize)]
pub struct TicketPath {
    ticket_id: String,
}

/// Request payload for opening a ticket.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateTicketRequestBody {
    #[schema(format = "uuid")]
    pub requestor_id: String,
    #[schema(format = "uuid")]
    pub category_id: String,
    #[schema(format = "uuid")]
    pub sub_category_id: String,
    #[schema(format = "uuid")]
    pub support_type_id: String,
    #[schema(example = "VPN drops every ten minutes")]
    pub details: String,
}

/// Partial update of the descriptive ticket fields.
///
/// `status` is not accepted here; status changes go through
/// `PATCH /tickets/{ticket_id}/status`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateTicketRequestBody {
    #[schema(format = "uuid")]
    pub category_id: Option<String>,
    #[schema(format = "uuid")]
    pub sub_category_id: Option<String>,
    #[schema(format = "uuid")]
    pub support_type_id: Option<String>,
    pub details: Option<String>,
}

/// Request payload for accepting a ticket.
///
/// `status` is optional; when present it must be `ongoing`, the only state
/// acceptance can lead to.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AcceptTicketRequestBody {
    #[schema(format = "uuid")]
    pub assigned_id: String,
    #[schema(example = "ongoing")]
    pub status: Option<String>,
}

/// Request payload for an administrative status change.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TransitionTicketRequestBody {
    #[schema(example = "resolved")]
    pub status: String,
}

fn parse_ticket_id(path: TicketPath) -> Result<Uuid, Error> {
    parse_uuid(path.ticket_id, FieldName::new("ticketId"))
}

fn parse_draft(payload: CreateTicketRequestBody) -> Result<TicketDraft, Error> {
    Ok(TicketDraft {
        requestor_id: parse_user_id(payload.requestor_id, FieldName::new("requestorId"))?,
        category_id: parse_uuid(payload.category_id, FieldName::new("categoryId"))?,
        sub_category_id: parse_uuid(payload.sub_category_id, FieldName::new("subCategoryId"))?,
        support_type_id: parse_uuid(payload.support_type_id, FieldName::new("supportTypeId"))?,
        details: payload.details,
    })
}

fn parse_patch(payload: UpdateTicketRequestBody) -> Result<TicketPatch, Error> {
    Ok(TicketPatch {
        category_id: parse_optional_uuid(payload.category_id, FieldName::new("categoryId"))?,
        sub_category_id: parse_optional_uuid(
            payload.sub_category_id,
            FieldName::new("subCategoryId"),
        )?,
        support_type_id: parse_optional_uuid(
            payload.support_type_id,
            FieldName::new("supportTypeId"),
        )?,
        details: payload.details,
    })
}

fn ensure_accept_status(status: Option<&str>) -> Result<(), Error> {
    let Some(raw) = status else {
        return Ok(());
    };
    let field = FieldName::new("status");
    if parse_status(raw, field)? == TicketStatus::Ongoing {
        Ok(())
    } else {
        Err(
            Error::invalid_request("accepting a ticket always moves it to ongoing").with_details(
                json!({ "field": "status", "value": raw, "code": "invalid_status" }),
            ),
        )
    }
}

/// List every ticket with requester and assignee display data.
#[utoipa::path(
    get,
    path = "/api/v1/tickets",
    responses(
        (status = 200, description = "Tickets, newest first", body = [TicketListingSchema]),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "listTickets"
)]
#[get("/tickets")]
pub async fn list_tickets(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<TicketListing>>> {
    Ok(web::Json(state.tickets_query.list_tickets().await?))
}

/// Open a ticket.
#[utoipa::path(
    post,
    path = "/api/v1/tickets",
    request_body = CreateTicketRequestBody,
    responses(
        (status = 201, description = "Ticket opened", body = TicketSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "createTicket"
)]
#[post("/tickets")]
pub async fn create_ticket(
    state: web::Data<HttpState>,
    payload: web::Json<CreateTicketRequestBody>,
) -> ApiResult<HttpResponse> {
    let draft = parse_draft(payload.into_inner())?;
    let ticket = state.tickets.create_ticket(draft).await?;
    Ok(HttpResponse::Created().json(ticket))
}

/// Fetch one ticket.
#[utoipa::path(
    get,
    path = "/api/v1/tickets/{ticket_id}",
    params(("ticket_id" = String, Path, description = "Ticket identifier")),
    responses(
        (status = 200, description = "Ticket", body = TicketSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "getTicket"
)]
#[get("/tickets/{ticket_id}")]
pub async fn get_ticket(
    state: web::Data<HttpState>,
    path: web::Path<TicketPath>,
) -> ApiResult<web::Json<Ticket>> {
    let ticket_id = parse_ticket_id(path.into_inner())?;
    Ok(web::Json(state.tickets_query.get_ticket(ticket_id).await?))
}

/// Change the category, sub-category, support type or details.
#[utoipa::path(
    patch,
    path = "/api/v1/tickets/{ticket_id}",
    params(("ticket_id" = String, Path, description = "Ticket identifier")),
    request_body = UpdateTicketRequestBody,
    responses(
        (status = 200, description = "Updated ticket", body = TicketSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "updateTicket"
)]
#[patch("/tickets/{ticket_id}")]
pub async fn update_ticket(
    state: web::Data<HttpState>,
    path: web::Path<TicketPath>,
    payload: web::Json<UpdateTicketRequestBody>,
) -> ApiResult<web::Json<Ticket>> {
    let ticket_id = parse_ticket_id(path.into_inner())?;
    let patch = parse_patch(payload.into_inner())?;
    Ok(web::Json(
        state.tickets.update_ticket(ticket_id, patch).await?,
    ))
}

/// Assign an open ticket to a support user.
#[utoipa::path(
    patch,
    path = "/api/v1/tickets/{ticket_id}/accept",
    params(("ticket_id" = String, Path, description = "Ticket identifier")),
    request_body = AcceptTicketRequestBody,
    responses(
        (status = 200, description = "Accepted ticket", body = TicketSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Ticket is assigned or no longer open", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "acceptTicket"
)]
#[patch("/tickets/{ticket_id}/accept")]
pub async fn accept_ticket(
    state: web::Data<HttpState>,
    path: web::Path<TicketPath>,
    payload: web::Json<AcceptTicketRequestBody>,
) -> ApiResult<web::Json<Ticket>> {
    let ticket_id = parse_ticket_id(path.into_inner())?;
    let AcceptTicketRequestBody {
        assigned_id,
        status,
    } = payload.into_inner();
    ensure_accept_status(status.as_deref())?;
    let assignee = parse_user_id(assigned_id, FieldName::new("assignedId"))?;
    Ok(web::Json(
        state.tickets.accept_ticket(ticket_id, assignee).await?,
    ))
}

/// Move a ticket along its lifecycle.
#[utoipa::path(
    patch,
    path = "/api/v1/tickets/{ticket_id}/status",
    params(("ticket_id" = String, Path, description = "Ticket identifier")),
    request_body = TransitionTicketRequestBody,
    responses(
        (status = 200, description = "Ticket with its new status", body = TicketSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Transition not allowed", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "transitionTicket"
)]
#[patch("/tickets/{ticket_id}/status")]
pub async fn transition_ticket(
    state: web::Data<HttpState>,
    path: web::Path<TicketPath>,
    payload: web::Json<TransitionTicketRequestBody>,
) -> ApiResult<web::Json<Ticket>> {
    let ticket_id = parse_ticket_id(path.into_inner())?;
    let status = parse_status(&payload.status, FieldName::new("status"))?;
    Ok(web::Json(
        state.tickets.transition_ticket(ticket_id, status).await?,
    ))
}

/// Delete a ticket; deleting a missing ticket reports no rows affected.
#[utoipa::path(
    delete,
    path = "/api/v1/tickets/{ticket_id}",
    params(("ticket_id" = String, Path, description = "Ticket identifier")),
    responses(
        (status = 200, description = "Delete outcome", body = DeleteResponseBody),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "deleteTicket"
)]
#[delete("/tickets/{ticket_id}")]
pub async fn delete_ticket(
    state: web::Data<HttpState>,
    path: web::Path<TicketPath>,
) -> ApiResult<web::Json<DeleteResponseBody>> {
    let ticket_id = parse_ticket_id(path.into_inner())?;
    let outcome = state.tickets.delete_ticket(ticket_id).await?;
    Ok(web::Json(DeleteResponseBody::from(outcome)))
}

#[cfg(test)]
#[path = "tickets_tests.rs"]
mod tests;
