//! Teams and the assignment relations they own.
//!
//! A support user belongs to at most one team and a category is owned by at
//! most one team. Both relations are written through [`AssignmentBatch`], so
//! team creation and later additions share one code path.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{EntityName, UserId, UserSummary};

/// A team of support users owning a set of categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    /// Team identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Team {
    /// Build a new team stamped with `now`.
    #[must_use]
    pub fn new(name: EntityName, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into_inner(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Which relation an assignment writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentKind {
    /// User to team.
    Member,
    /// Category to team.
    Category,
}

impl AssignmentKind {
    /// Lowercase label used in messages and error details.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Category => "category",
        }
    }
}

impl fmt::Display for AssignmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of children (users or categories) to attach to one team.
///
/// Identifiers are de-duplicated on construction, keeping first-seen order.
///
/// # Examples
/// ```
/// use helpdesk::domain::{AssignmentBatch, AssignmentKind};
/// use uuid::Uuid;
///
/// let id = Uuid::new_v4();
/// let batch = AssignmentBatch::new(AssignmentKind::Category, vec![id, id]);
/// assert_eq!(batch.child_ids(), &[id]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentBatch {
    kind: AssignmentKind,
    child_ids: Vec<Uuid>,
}

impl AssignmentBatch {
    /// Build a batch, dropping repeated identifiers.
    #[must_use]
    pub fn new(kind: AssignmentKind, child_ids: Vec<Uuid>) -> Self {
        let mut unique = Vec::with_capacity(child_ids.len());
        for id in child_ids {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        Self {
            kind,
            child_ids: unique,
        }
    }

    /// Batch of team members.
    #[must_use]
    pub fn members(user_ids: &[UserId]) -> Self {
        Self::new(
            AssignmentKind::Member,
            user_ids.iter().map(|id| *id.as_uuid()).collect(),
        )
    }

    /// Batch of owned categories.
    #[must_use]
    pub fn categories(category_ids: Vec<Uuid>) -> Self {
        Self::new(AssignmentKind::Category, category_ids)
    }

    /// Relation written by this batch.
    pub const fn kind(&self) -> AssignmentKind {
        self.kind
    }

    /// Children to attach.
    pub fn child_ids(&self) -> &[Uuid] {
        &self.child_ids
    }

    /// Whether the batch attaches nothing.
    pub fn is_empty(&self) -> bool {
        self.child_ids.is_empty()
    }
}

/// Identifier and name of a category, as listed by assignment views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    /// Category identifier.
    pub id: Uuid,
    /// Category name.
    pub name: String,
}

/// Result of creating a team: its record plus the members now on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedTeam {
    /// The stored team.
    pub team: Team,
    /// Members assigned during creation.
    pub roster: Vec<UserSummary>,
}
