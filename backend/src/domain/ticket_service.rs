//! Ticket lifecycle service.
//!
//! Implements [`TicketCommand`] and [`TicketQuery`]. References to users and
//! catalogue entries are checked before each write. The conditional writes
//! (`accept`, `transition`) are compare-and-set in the repository; when one
//! reports no match the service re-reads the ticket to explain why.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::domain::ports::{
    CatalogueRepository, CatalogueRepositoryError, TicketCommand, TicketQuery, TicketRepository,
    TicketRepositoryError, UserDirectory, UserDirectoryError,
};
use crate::domain::{
    DeleteOutcome, Error, Ticket, TicketDraft, TicketListing, TicketPatch, TicketStatus,
    TicketValidationError, UserId,
};

/// Ticket lifecycle use cases.
#[derive(Clone)]
pub struct TicketService<T, U, C> {
    tickets: Arc<T>,
    users: Arc<U>,
    catalogue: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<T, U, C> TicketService<T, U, C> {
    /// Create a service over the given ports.
    pub fn new(
        tickets: Arc<T>,
        users: Arc<U>,
        catalogue: Arc<C>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            tickets,
            users,
            catalogue,
            clock,
        }
    }
}

fn map_ticket_error(error: TicketRepositoryError) -> Error {
    match error {
        TicketRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("ticket repository unavailable: {message}"))
        }
        TicketRepositoryError::Query { message } => {
            Error::internal(format!("ticket repository error: {message}"))
        }
        TicketRepositoryError::UnknownReference { message } => Error::invalid_request(message)
            .with_details(json!({ "code": "unknown_reference" })),
    }
}

fn map_user_error(error: UserDirectoryError) -> Error {
    match error {
        UserDirectoryError::Connection { message } => {
            Error::service_unavailable(format!("user directory unavailable: {message}"))
        }
        UserDirectoryError::Query { message } => {
            Error::internal(format!("user directory error: {message}"))
        }
    }
}

fn map_catalogue_error(error: CatalogueRepositoryError) -> Error {
    match error {
        CatalogueRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("catalogue repository unavailable: {message}"))
        }
        other => Error::internal(format!("catalogue repository error: {other}")),
    }
}

fn map_validation_error(error: TicketValidationError) -> Error {
    let field = match error {
        TicketValidationError::EmptyDetails => "details",
        TicketValidationError::EmptyPatch => "body",
    };
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": field,
        "code": "invalid_ticket",
    }))
}

fn reference_error(field: &str, value: impl serde::Serialize, message: String) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "value": value,
        "code": "unknown_reference",
    }))
}

fn ticket_not_found(ticket_id: Uuid) -> Error {
    Error::not_found(format!("ticket {ticket_id} not found"))
        .with_details(json!({ "ticketId": ticket_id }))
}

fn status_conflict(ticket: &Ticket, requested: TicketStatus, message: String) -> Error {
    Error::conflict(message).with_details(json!({
        "ticketId": ticket.id,
        "status": ticket.status,
        "requested": requested,
        "code": "invalid_transition",
    }))
}

/// Catalogue references carried by a ticket.
struct References {
    category_id: Uuid,
    sub_category_id: Uuid,
    support_type_id: Uuid,
}

impl From<&Ticket> for References {
    fn from(ticket: &Ticket) -> Self {
        Self {
            category_id: ticket.category_id,
            sub_category_id: ticket.sub_category_id,
            support_type_id: ticket.support_type_id,
        }
    }
}

impl<T, U, C> TicketService<T, U, C>
where
    T: TicketRepository,
    U: UserDirectory,
    C: CatalogueRepository,
{
    async fn require_ticket(&self, ticket_id: Uuid) -> Result<Ticket, Error> {
        self.tickets
            .find_by_id(ticket_id)
            .await
            .map_err(map_ticket_error)?
            .ok_or_else(|| ticket_not_found(ticket_id))
    }

    async fn ensure_references(&self, refs: References) -> Result<(), Error> {
        if self
            .catalogue
            .find_category(refs.category_id)
            .await
            .map_err(map_catalogue_error)?
            .is_none()
        {
            return Err(reference_error(
                "categoryId",
                refs.category_id,
                format!("category {} does not exist", refs.category_id),
            ));
        }

        let sub_category = self
            .catalogue
            .find_sub_category(refs.sub_category_id)
            .await
            .map_err(map_catalogue_error)?
            .ok_or_else(|| {
                reference_error(
                    "subCategoryId",
                    refs.sub_category_id,
                    format!("sub-category {} does not exist", refs.sub_category_id),
                )
            })?;
        if sub_category.category_id != refs.category_id {
            return Err(Error::invalid_request(format!(
                "sub-category {} does not belong to category {}",
                refs.sub_category_id, refs.category_id
            ))
            .with_details(json!({
                "field": "subCategoryId",
                "value": refs.sub_category_id,
                "code": "category_mismatch",
            })));
        }

        if self
            .catalogue
            .find_support_type(refs.support_type_id)
            .await
            .map_err(map_catalogue_error)?
            .is_none()
        {
            return Err(reference_error(
                "supportTypeId",
                refs.support_type_id,
                format!("support type {} does not exist", refs.support_type_id),
            ));
        }
        Ok(())
    }

    async fn ensure_requestor(&self, user_id: &UserId) -> Result<(), Error> {
        self.users
            .find_user(user_id)
            .await
            .map_err(map_user_error)?
            .map(|_| ())
            .ok_or_else(|| {
                reference_error(
                    "requestorId",
                    user_id,
                    format!("user {user_id} does not exist"),
                )
            })
    }

    async fn ensure_assignee(&self, user_id: &UserId) -> Result<(), Error> {
        let user = self
            .users
            .find_user(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| {
                reference_error(
                    "assignedId",
                    user_id,
                    format!("user {user_id} does not exist"),
                )
            })?;
        if !user.role.is_support() {
            return Err(
                Error::invalid_request(format!("user {user_id} is not a support user"))
                    .with_details(json!({
                        "field": "assignedId",
                        "value": user_id,
                        "code": "not_support_user",
                    })),
            );
        }
        Ok(())
    }

    /// Explain why a conditional accept matched nothing.
    fn explain_failed_accept(ticket: Ticket, assignee: &UserId) -> Result<Ticket, Error> {
        match ticket.assigned_id {
            Some(current) if current == *assignee && ticket.status == TicketStatus::Ongoing => {
                Ok(ticket)
            }
            Some(current) if current != *assignee => Err(Error::conflict(format!(
                "ticket {} is already assigned to another user",
                ticket.id
            ))
            .with_details(json!({
                "ticketId": ticket.id,
                "assignedId": current,
                "code": "already_assigned",
            }))),
            _ => Err(status_conflict(
                &ticket,
                TicketStatus::Ongoing,
                format!(
                    "ticket {} is {} and cannot be accepted",
                    ticket.id, ticket.status
                ),
            )),
        }
    }
}

#[async_trait]
impl<T, U, C> TicketCommand for TicketService<T, U, C>
where
    T: TicketRepository,
    U: UserDirectory,
    C: CatalogueRepository,
{
    async fn create_ticket(&self, draft: TicketDraft) -> Result<Ticket, Error> {
        let ticket = Ticket::open(draft, self.clock.utc()).map_err(map_validation_error)?;
        self.ensure_requestor(&ticket.requestor_id).await?;
        self.ensure_references(References::from(&ticket)).await?;

        self.tickets
            .insert(&ticket)
            .await
            .map_err(map_ticket_error)?;
        info!(ticket_id = %ticket.id, requestor_id = %ticket.requestor_id, "ticket created");
        Ok(ticket)
    }

    async fn accept_ticket(&self, ticket_id: Uuid, assignee: UserId) -> Result<Ticket, Error> {
        // A missing ticket is reported before anything about the assignee.
        self.require_ticket(ticket_id).await?;
        self.ensure_assignee(&assignee).await?;

        let accepted = self
            .tickets
            .accept(ticket_id, &assignee, self.clock.utc())
            .await
            .map_err(map_ticket_error)?;
        if let Some(ticket) = accepted {
            info!(%ticket_id, assigned_id = %assignee, "ticket accepted");
            return Ok(ticket);
        }

        let latest = self.require_ticket(ticket_id).await?;
        Self::explain_failed_accept(latest, &assignee)
    }

    async fn update_ticket(&self, ticket_id: Uuid, patch: TicketPatch) -> Result<Ticket, Error> {
        let patch = patch.validated().map_err(map_validation_error)?;
        let current = self.require_ticket(ticket_id).await?;
        let merged = current.patched(&patch, self.clock.utc());

        let touches_references = patch.category_id.is_some()
            || patch.sub_category_id.is_some()
            || patch.support_type_id.is_some();
        if touches_references {
            self.ensure_references(References::from(&merged)).await?;
        }

        let updated = self
            .tickets
            .update_fields(&merged)
            .await
            .map_err(map_ticket_error)?
            .ok_or_else(|| ticket_not_found(ticket_id))?;
        info!(%ticket_id, "ticket updated");
        Ok(updated)
    }

    async fn transition_ticket(
        &self,
        ticket_id: Uuid,
        status: TicketStatus,
    ) -> Result<Ticket, Error> {
        let current = self.require_ticket(ticket_id).await?;
        if current.status == TicketStatus::Open && status == TicketStatus::Ongoing {
            return Err(status_conflict(
                &current,
                status,
                "open tickets become ongoing only by being accepted".to_owned(),
            ));
        }
        if !current.status.can_transition_to(status) {
            return Err(status_conflict(
                &current,
                status,
                format!("cannot move ticket from {} to {status}", current.status),
            ));
        }

        let moved = self
            .tickets
            .transition(ticket_id, current.status, status, self.clock.utc())
            .await
            .map_err(map_ticket_error)?;
        if let Some(ticket) = moved {
            info!(%ticket_id, from = %current.status, to = %status, "ticket status changed");
            return Ok(ticket);
        }

        let latest = self.require_ticket(ticket_id).await?;
        Err(status_conflict(
            &latest,
            status,
            format!("ticket {ticket_id} changed status concurrently"),
        ))
    }

    async fn delete_ticket(&self, ticket_id: Uuid) -> Result<DeleteOutcome, Error> {
        let outcome = self
            .tickets
            .delete(ticket_id)
            .await
            .map_err(map_ticket_error)?;
        info!(%ticket_id, outcome = outcome.message(), "ticket delete requested");
        Ok(outcome)
    }
}

#[async_trait]
impl<T, U, C> TicketQuery for TicketService<T, U, C>
where
    T: TicketRepository,
    U: UserDirectory,
    C: CatalogueRepository,
{
    async fn get_ticket(&self, ticket_id: Uuid) -> Result<Ticket, Error> {
        self.require_ticket(ticket_id).await
    }

    async fn list_tickets(&self) -> Result<Vec<TicketListing>, Error> {
        self.tickets
            .list_listings()
            .await
            .map_err(map_ticket_error)
    }
}

#[cfg(test)]
#[path = "ticket_service_tests.rs"]
mod tests;
