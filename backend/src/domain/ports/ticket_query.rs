//! Driving port for ticket reads.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Error, Ticket, TicketListing};

/// Read-only ticket use cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketQuery: Send + Sync {
    /// One ticket; `not_found` when absent.
    async fn get_ticket(&self, ticket_id: Uuid) -> Result<Ticket, Error>;

    /// Every ticket with requester and assignee display data.
    async fn list_tickets(&self) -> Result<Vec<TicketListing>, Error>;
}
