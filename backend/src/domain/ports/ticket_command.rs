//! Driving port for ticket lifecycle writes.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{DeleteOutcome, Error, Ticket, TicketDraft, TicketPatch, TicketStatus, UserId};

/// Use-case port for creating and moving tickets through their lifecycle.
///
/// Status changes never go through [`TicketCommand::update_ticket`]; the
/// `open -> ongoing` step belongs to [`TicketCommand::accept_ticket`] and the
/// administrative steps to [`TicketCommand::transition_ticket`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketCommand: Send + Sync {
    /// Open a new, unassigned ticket.
    ///
    /// # Errors
    ///
    /// Returns `invalid_request` when the requester or any catalogue
    /// reference is missing, or the sub-category sits under another
    /// category.
    async fn create_ticket(&self, draft: TicketDraft) -> Result<Ticket, Error>;

    /// Assign an open ticket to a support user and mark it ongoing.
    ///
    /// Accepting again with the same assignee returns the ticket unchanged.
    async fn accept_ticket(&self, ticket_id: Uuid, assignee: UserId) -> Result<Ticket, Error>;

    /// Apply a partial change to the descriptive fields.
    async fn update_ticket(&self, ticket_id: Uuid, patch: TicketPatch) -> Result<Ticket, Error>;

    /// Administrative status change enforcing the lifecycle.
    async fn transition_ticket(
        &self,
        ticket_id: Uuid,
        status: TicketStatus,
    ) -> Result<Ticket, Error>;

    /// Delete a ticket; a missing row is reported, not raised.
    async fn delete_ticket(&self, ticket_id: Uuid) -> Result<DeleteOutcome, Error>;
}
