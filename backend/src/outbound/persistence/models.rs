//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions to domain types live next to
//! each row.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::{Nullable, Text, Timestamptz, Uuid as SqlUuid};
use uuid::Uuid;

use crate::domain::{
    Category, SubCategory, SubCategoryListing, SupportType, Team, Ticket, TicketListing,
    TicketStatus, TicketStatusParseError, User, UserId, UserRole, UserSummary,
};

use super::schema::{
    categories, category_assignments, sub_categories, support_types, team_assignments, teams,
    tickets, users,
};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub role: String,
    pub image: Option<String>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::from_uuid(row.id),
            role: UserRole::from(row.role.as_str()),
            name: row.name,
            image: row.image,
        }
    }
}

impl From<UserRow> for UserSummary {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::from_uuid(row.id),
            name: row.name,
            image: row.image,
        }
    }
}

// ---------------------------------------------------------------------------
// Teams and assignments
// ---------------------------------------------------------------------------

/// Row struct for the teams table, used for reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = teams)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TeamRow {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Team> for TeamRow {
    fn from(team: &Team) -> Self {
        Self {
            id: team.id,
            name: team.name.clone(),
            created_at: team.created_at,
            updated_at: team.updated_at,
        }
    }
}

impl From<TeamRow> for Team {
    fn from(row: TeamRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Insertable membership row; the id defaults in the database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = team_assignments)]
pub(crate) struct NewTeamAssignmentRow {
    pub team_id: Uuid,
    pub user_id: Uuid,
}

/// Insertable category ownership row; the id defaults in the database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = category_assignments)]
pub(crate) struct NewCategoryAssignmentRow {
    pub team_id: Uuid,
    pub category_id: Uuid,
}

// ---------------------------------------------------------------------------
// Catalogue
// ---------------------------------------------------------------------------

/// Row struct for the categories table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CategoryRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Category> for CategoryRow {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            description: category.description.clone(),
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Row struct for the sub_categories table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = sub_categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SubCategoryRow {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&SubCategory> for SubCategoryRow {
    fn from(sub: &SubCategory) -> Self {
        Self {
            id: sub.id,
            category_id: sub.category_id,
            name: sub.name.clone(),
            description: sub.description.clone(),
            created_at: sub.created_at,
            updated_at: sub.updated_at,
        }
    }
}

impl From<SubCategoryRow> for SubCategory {
    fn from(row: SubCategoryRow) -> Self {
        Self {
            id: row.id,
            category_id: row.category_id,
            name: row.name,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl SubCategoryRow {
    /// Combine with the parent name selected alongside it.
    pub(crate) fn into_listing(self, category: String) -> SubCategoryListing {
        SubCategoryListing {
            id: self.id,
            name: self.name,
            category,
            description: self.description,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Row struct for the support_types table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = support_types)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SupportTypeRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&SupportType> for SupportTypeRow {
    fn from(support_type: &SupportType) -> Self {
        Self {
            id: support_type.id,
            name: support_type.name.clone(),
            description: support_type.description.clone(),
            created_at: support_type.created_at,
        }
    }
}

impl From<SupportTypeRow> for SupportType {
    fn from(row: SupportTypeRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Tickets
// ---------------------------------------------------------------------------

/// Row struct for the tickets table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = tickets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TicketRow {
    pub id: Uuid,
    pub requestor_id: Uuid,
    pub assigned_id: Option<Uuid>,
    pub category_id: Uuid,
    pub sub_category_id: Uuid,
    pub support_type_id: Uuid,
    pub details: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Ticket> for TicketRow {
    fn from(ticket: &Ticket) -> Self {
        Self {
            id: ticket.id,
            requestor_id: *ticket.requestor_id.as_uuid(),
            assigned_id: ticket.assigned_id.map(|id| *id.as_uuid()),
            category_id: ticket.category_id,
            sub_category_id: ticket.sub_category_id,
            support_type_id: ticket.support_type_id,
            details: ticket.details.clone(),
            status: ticket.status.as_str().to_owned(),
            created_at: ticket.created_at,
            updated_at: ticket.updated_at,
        }
    }
}

impl TryFrom<TicketRow> for Ticket {
    type Error = TicketStatusParseError;

    fn try_from(row: TicketRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            requestor_id: UserId::from_uuid(row.requestor_id),
            assigned_id: row.assigned_id.map(UserId::from_uuid),
            category_id: row.category_id,
            sub_category_id: row.sub_category_id,
            support_type_id: row.support_type_id,
            details: row.details,
            status: row.status.parse::<TicketStatus>()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Changeset for the descriptive ticket fields.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tickets)]
pub(crate) struct TicketFieldsUpdate<'a> {
    pub category_id: Uuid,
    pub sub_category_id: Uuid,
    pub support_type_id: Uuid,
    pub details: &'a str,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a Ticket> for TicketFieldsUpdate<'a> {
    fn from(ticket: &'a Ticket) -> Self {
        Self {
            category_id: ticket.category_id,
            sub_category_id: ticket.sub_category_id,
            support_type_id: ticket.support_type_id,
            details: ticket.details.as_str(),
            updated_at: ticket.updated_at,
        }
    }
}

/// Row produced by the ticket listing query.
#[derive(Debug, Clone, QueryableByName)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TicketListingRow {
    #[diesel(sql_type = SqlUuid)]
    pub id: Uuid,
    #[diesel(sql_type = Text)]
    pub requested_by: String,
    #[diesel(sql_type = Nullable<Text>)]
    pub requested_by_avatar: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub assigned_to: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub assigned_to_avatar: Option<String>,
    #[diesel(sql_type = Text)]
    pub details: String,
    #[diesel(sql_type = Text)]
    pub status: String,
    #[diesel(sql_type = Timestamptz)]
    pub created_at: DateTime<Utc>,
    #[diesel(sql_type = Timestamptz)]
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<TicketListingRow> for TicketListing {
    type Error = TicketStatusParseError;

    fn try_from(row: TicketListingRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            requested_by: row.requested_by,
            requested_by_avatar: row.requested_by_avatar,
            assigned_to: row.assigned_to,
            assigned_to_avatar: row.assigned_to_avatar,
            details: row.details,
            status: row.status.parse::<TicketStatus>()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for row conversions.
    use super::*;
    use rstest::rstest;

    fn ticket_row(status: &str) -> TicketRow {
        let now = Utc::now();
        TicketRow {
            id: Uuid::new_v4(),
            requestor_id: Uuid::new_v4(),
            assigned_id: None,
            category_id: Uuid::new_v4(),
            sub_category_id: Uuid::new_v4(),
            support_type_id: Uuid::new_v4(),
            details: "laptop will not boot".to_owned(),
            status: status.to_owned(),
            created_at: now,
            updated_at: now,
        }
    }

    #[rstest]
    fn unknown_status_is_rejected() {
        let result = Ticket::try_from(ticket_row("archived"));
        assert_eq!(result, Err(TicketStatusParseError("archived".to_owned())));
    }

    #[rstest]
    fn ticket_row_preserves_fields() {
        let row = ticket_row("ongoing");
        let ticket = Ticket::try_from(row.clone()).expect("valid row");
        assert_eq!(ticket.status, TicketStatus::Ongoing);
        let back = TicketRow::from(&ticket);
        assert_eq!(back.status, "ongoing");
        assert_eq!(back.details, row.details);
    }

    #[rstest]
    fn user_row_maps_role() {
        let row = UserRow {
            id: Uuid::new_v4(),
            name: "Ada".to_owned(),
            role: "support".to_owned(),
            image: None,
        };
        assert!(User::from(row).role.is_support());
    }
}
