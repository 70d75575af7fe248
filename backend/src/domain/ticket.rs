//! Support tickets and their status machine.
//!
//! ```text
//! open --accept--> ongoing --> resolved --> closed
//!   \                 \                      ^
//!    `-----------------`---------------------'
//! ```
//!
//! `open -> ongoing` only happens through acceptance, which also records the
//! assignee. Nothing leaves `closed`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::UserId;

/// Lifecycle state of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// Submitted and waiting for a support user.
    Open,
    /// Accepted and being worked.
    Ongoing,
    /// Work finished, awaiting closure.
    Resolved,
    /// Terminal state.
    Closed,
}

/// Error returned when parsing an unknown status label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown ticket status: {0}")]
pub struct TicketStatusParseError(pub String);

impl TicketStatus {
    /// Storage and wire label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Ongoing => "ongoing",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }

    /// Whether an administrative transition from `self` to `next` is legal.
    ///
    /// `open -> ongoing` is excluded because only acceptance may take it.
    ///
    /// # Examples
    /// ```
    /// use helpdesk::domain::TicketStatus;
    ///
    /// assert!(TicketStatus::Ongoing.can_transition_to(TicketStatus::Resolved));
    /// assert!(!TicketStatus::Open.can_transition_to(TicketStatus::Ongoing));
    /// assert!(!TicketStatus::Closed.can_transition_to(TicketStatus::Open));
    /// ```
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Ongoing, Self::Resolved)
                | (Self::Resolved, Self::Closed)
                | (Self::Open, Self::Closed)
                | (Self::Ongoing, Self::Closed)
        )
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = TicketStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "ongoing" => Ok(Self::Ongoing),
            "resolved" => Ok(Self::Resolved),
            "closed" => Ok(Self::Closed),
            other => Err(TicketStatusParseError(other.to_owned())),
        }
    }
}

/// Validation errors for ticket input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TicketValidationError {
    /// Details were empty once trimmed.
    #[error("details must not be empty")]
    EmptyDetails,
    /// A patch carried no fields.
    #[error("at least one field must be provided")]
    EmptyPatch,
}

/// A stored ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    /// Ticket identifier.
    pub id: Uuid,
    /// User who raised the ticket.
    pub requestor_id: UserId,
    /// Support user working the ticket; absent until accepted.
    pub assigned_id: Option<UserId>,
    /// Category.
    pub category_id: Uuid,
    /// Sub-category; always a child of `category_id`.
    pub sub_category_id: Uuid,
    /// Support type.
    pub support_type_id: Uuid,
    /// Free-text description of the problem.
    pub details: String,
    /// Lifecycle state.
    pub status: TicketStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Input for raising a ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketDraft {
    /// User raising the ticket.
    pub requestor_id: UserId,
    /// Category.
    pub category_id: Uuid,
    /// Sub-category.
    pub sub_category_id: Uuid,
    /// Support type.
    pub support_type_id: Uuid,
    /// Problem description.
    pub details: String,
}

impl Ticket {
    /// Open a new, unassigned ticket from a draft.
    pub fn open(draft: TicketDraft, now: DateTime<Utc>) -> Result<Self, TicketValidationError> {
        Ok(Self {
            id: Uuid::new_v4(),
            requestor_id: draft.requestor_id,
            assigned_id: None,
            category_id: draft.category_id,
            sub_category_id: draft.sub_category_id,
            support_type_id: draft.support_type_id,
            details: normalise_details(&draft.details)?,
            status: TicketStatus::Open,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a patch, returning the merged ticket.
    #[must_use]
    pub fn patched(&self, patch: &TicketPatch, now: DateTime<Utc>) -> Self {
        let mut next = self.clone();
        if let Some(category_id) = patch.category_id {
            next.category_id = category_id;
        }
        if let Some(sub_category_id) = patch.sub_category_id {
            next.sub_category_id = sub_category_id;
        }
        if let Some(support_type_id) = patch.support_type_id {
            next.support_type_id = support_type_id;
        }
        if let Some(details) = &patch.details {
            next.details.clone_from(details);
        }
        next.updated_at = now;
        next
    }
}

fn normalise_details(raw: &str) -> Result<String, TicketValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TicketValidationError::EmptyDetails);
    }
    Ok(trimmed.to_owned())
}

/// Partial update of a ticket's descriptive fields.
///
/// Status and assignee are deliberately absent; they change through
/// acceptance and transitions only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketPatch {
    /// New category.
    pub category_id: Option<Uuid>,
    /// New sub-category.
    pub sub_category_id: Option<Uuid>,
    /// New support type.
    pub support_type_id: Option<Uuid>,
    /// New details.
    pub details: Option<String>,
}

impl TicketPatch {
    /// Validate the patch: at least one field, non-blank details.
    pub fn validated(mut self) -> Result<Self, TicketValidationError> {
        if self.category_id.is_none()
            && self.sub_category_id.is_none()
            && self.support_type_id.is_none()
            && self.details.is_none()
        {
            return Err(TicketValidationError::EmptyPatch);
        }
        if let Some(details) = self.details.take() {
            self.details = Some(normalise_details(&details)?);
        }
        Ok(self)
    }
}

/// Joined view of a ticket with requester and assignee display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketListing {
    /// Ticket identifier.
    pub id: Uuid,
    /// Requester name.
    pub requested_by: String,
    /// Requester avatar.
    pub requested_by_avatar: Option<String>,
    /// Assignee name, absent until accepted.
    pub assigned_to: Option<String>,
    /// Assignee avatar.
    pub assigned_to_avatar: Option<String>,
    /// Problem description.
    pub details: String,
    /// Lifecycle state.
    pub status: TicketStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}
