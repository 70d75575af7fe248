//! Driving port for assignment registry writes.
//!
//! HTTP handlers call [`TeamCommand`] to create teams and attach members or
//! categories. Every method is all-or-nothing: a conflict on any child leaves
//! the registry untouched.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{CreatedTeam, DeleteOutcome, Error, UserId};

/// Request to create a team together with its initial assignments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamRequest {
    /// Display name for the team; trimmed before storage.
    pub name: String,
    /// Support users to place on the team.
    pub member_ids: Vec<UserId>,
    /// Categories the team will own.
    pub category_ids: Vec<Uuid>,
}

/// Use-case port for changing team assignments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TeamCommand: Send + Sync {
    /// Create a team with its members and categories in one transaction.
    ///
    /// # Errors
    ///
    /// - `invalid_request` when the name is blank or a member is unknown or
    ///   not a support user.
    /// - `conflict` when a member or category already belongs to a team.
    async fn create_team(&self, request: CreateTeamRequest) -> Result<CreatedTeam, Error>;

    /// Add support users to an existing team.
    async fn add_members(&self, team_id: Uuid, user_ids: Vec<UserId>) -> Result<(), Error>;

    /// Give an existing team ownership of more categories.
    async fn add_categories(&self, team_id: Uuid, category_ids: Vec<Uuid>) -> Result<(), Error>;

    /// Delete a team that has no assignments left.
    async fn delete_team(&self, team_id: Uuid) -> Result<DeleteOutcome, Error>;
}
