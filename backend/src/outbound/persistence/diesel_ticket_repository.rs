//! PostgreSQL-backed `TicketRepository` implementation.
//!
//! Acceptance and status transitions are single conditional `UPDATE ...
//! RETURNING` statements, so a concurrent reader sees either the old row or
//! the fully updated one.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_query;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{TicketRepository, TicketRepositoryError};
use crate::domain::{DeleteOutcome, Ticket, TicketListing, TicketStatus, UserId};

use super::error_mapping::{DieselFailure, classify_diesel_error, pool_error_message};
use super::models::{TicketFieldsUpdate, TicketListingRow, TicketRow};
use super::pool::{DbPool, PoolError};
use super::schema::tickets;

/// Requester is always present (inner join); assignee only once accepted.
const LIST_TICKETS_SQL: &str = r#"
SELECT
    t.id,
    requester.name AS requested_by,
    requester.image AS requested_by_avatar,
    assignee.name AS assigned_to,
    assignee.image AS assigned_to_avatar,
    t.details,
    t.status,
    t.created_at,
    t.updated_at
FROM tickets t
INNER JOIN users requester ON requester.id = t.requestor_id
LEFT JOIN users assignee ON assignee.id = t.assigned_id
ORDER BY t.created_at DESC, t.id
"#;

/// Diesel-backed implementation of the [`TicketRepository`] port.
#[derive(Clone)]
pub struct DieselTicketRepository {
    pool: DbPool,
}

impl DieselTicketRepository {
    /// Create a repository over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TicketRepositoryError {
    TicketRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> TicketRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::Connection => TicketRepositoryError::connection("database connection error"),
        DieselFailure::ForeignKeyViolation { constraint } => {
            TicketRepositoryError::unknown_reference(describe_reference(constraint.as_deref()))
        }
        DieselFailure::UniqueViolation { .. } => {
            TicketRepositoryError::query("ticket identifier already exists")
        }
        DieselFailure::Query(message) => TicketRepositoryError::query(message),
    }
}

/// Name the missing record from the violated foreign key.
fn describe_reference(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some(name) if name.contains("requestor_id") => "requesting user does not exist",
        Some(name) if name.contains("assigned_id") => "assigned user does not exist",
        Some(name) if name.contains("sub_category_id") => "sub-category does not exist",
        Some(name) if name.contains("category_id") => "category does not exist",
        Some(name) if name.contains("support_type_id") => "support type does not exist",
        _ => "a referenced record does not exist",
    }
}

fn row_to_ticket(row: TicketRow) -> Result<Ticket, TicketRepositoryError> {
    Ticket::try_from(row).map_err(|err| TicketRepositoryError::query(err.to_string()))
}

#[async_trait]
impl TicketRepository for DieselTicketRepository {
    async fn insert(&self, ticket: &Ticket) -> Result<(), TicketRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(tickets::table)
            .values(&TicketRow::from(ticket))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn find_by_id(&self, ticket_id: Uuid) -> Result<Option<Ticket>, TicketRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = tickets::table
            .filter(tickets::id.eq(ticket_id))
            .select(TicketRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_ticket).transpose()
    }

    async fn accept(
        &self,
        ticket_id: Uuid,
        assignee: &UserId,
        at: DateTime<Utc>,
    ) -> Result<Option<Ticket>, TicketRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::update(
            tickets::table
                .filter(tickets::id.eq(ticket_id))
                .filter(tickets::status.eq(TicketStatus::Open.as_str()))
                .filter(tickets::assigned_id.is_null()),
        )
        .set((
            tickets::assigned_id.eq(Some(*assignee.as_uuid())),
            tickets::status.eq(TicketStatus::Ongoing.as_str()),
            tickets::updated_at.eq(at),
        ))
        .returning(TicketRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;
        row.map(row_to_ticket).transpose()
    }

    async fn update_fields(&self, ticket: &Ticket) -> Result<Option<Ticket>, TicketRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::update(tickets::table.filter(tickets::id.eq(ticket.id)))
            .set(&TicketFieldsUpdate::from(ticket))
            .returning(TicketRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_ticket).transpose()
    }

    async fn transition(
        &self,
        ticket_id: Uuid,
        from: TicketStatus,
        to: TicketStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<Ticket>, TicketRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::update(
            tickets::table
                .filter(tickets::id.eq(ticket_id))
                .filter(tickets::status.eq(from.as_str())),
        )
        .set((
            tickets::status.eq(to.as_str()),
            tickets::updated_at.eq(at),
        ))
        .returning(TicketRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;
        row.map(row_to_ticket).transpose()
    }

    async fn delete(&self, ticket_id: Uuid) -> Result<DeleteOutcome, TicketRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(tickets::table.filter(tickets::id.eq(ticket_id)))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(DeleteOutcome::from_affected_rows(deleted))
    }

    async fn list_listings(&self) -> Result<Vec<TicketListing>, TicketRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TicketListingRow> = sql_query(LIST_TICKETS_SQL)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|row| {
                TicketListing::try_from(row)
                    .map_err(|err| TicketRepositoryError::query(err.to_string()))
            })
            .collect()
    }
}
