//! Driven port for ticket persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{DeleteOutcome, Ticket, TicketListing, TicketStatus, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by ticket repository adapters.
    pub enum TicketRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "ticket repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "ticket repository query failed: {message}",
        /// A referenced user or catalogue entry does not exist.
        UnknownReference { message: String } =>
            "ticket references a missing record: {message}",
    }
}

/// Port for storing and reading tickets.
///
/// The conditional writes (`accept`, `transition`) return `None` when their
/// precondition did not hold, leaving the caller to re-read and decide why.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Persist a new ticket.
    async fn insert(&self, ticket: &Ticket) -> Result<(), TicketRepositoryError>;

    /// Find a ticket by id.
    async fn find_by_id(&self, ticket_id: Uuid) -> Result<Option<Ticket>, TicketRepositoryError>;

    /// Set the assignee and move to `ongoing` in one write, only when the
    /// ticket is still `open` and unassigned.
    async fn accept(
        &self,
        ticket_id: Uuid,
        assignee: &UserId,
        at: DateTime<Utc>,
    ) -> Result<Option<Ticket>, TicketRepositoryError>;

    /// Overwrite descriptive fields with those of `ticket`.
    ///
    /// Returns `None` when the ticket no longer exists.
    async fn update_fields(&self, ticket: &Ticket) -> Result<Option<Ticket>, TicketRepositoryError>;

    /// Change status from `from` to `to`, only when the stored status is
    /// still `from`.
    async fn transition(
        &self,
        ticket_id: Uuid,
        from: TicketStatus,
        to: TicketStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<Ticket>, TicketRepositoryError>;

    /// Delete a ticket.
    async fn delete(&self, ticket_id: Uuid) -> Result<DeleteOutcome, TicketRepositoryError>;

    /// Every ticket joined with requester and assignee display data, newest
    /// first, read from one snapshot.
    async fn list_listings(&self) -> Result<Vec<TicketListing>, TicketRepositoryError>;
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[test]
    fn unknown_reference_formats_message() {
        let err = TicketRepositoryError::unknown_reference("category");
        assert!(err.to_string().contains("category"));
    }
}
