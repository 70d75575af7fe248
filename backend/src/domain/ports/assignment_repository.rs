//! Driven port for teams and their member/category assignments.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    AssignmentBatch, AssignmentKind, CategorySummary, DeleteOutcome, Team, UserId, UserSummary,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by assignment repository adapters.
    pub enum AssignmentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "assignment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "assignment repository query failed: {message}",
        /// The target team does not exist.
        TeamNotFound { team_id: Uuid } => "team {team_id} does not exist",
        /// A child in the batch already belongs to a team.
        AlreadyAssigned { kind: AssignmentKind, child_id: Uuid } =>
            "{kind} {child_id} is already assigned to a team",
        /// The storage-level uniqueness guard rejected a concurrent write.
        Contended { kind: AssignmentKind } =>
            "a {kind} in the request was assigned concurrently",
        /// A child in the batch does not exist.
        UnknownReference { kind: AssignmentKind, child_id: Uuid } =>
            "{kind} {child_id} does not exist",
        /// The team still owns members or categories.
        TeamInUse { team_id: Uuid } => "team {team_id} still has assignments",
    }
}

/// Port for the assignment registry.
///
/// Writes are all-or-nothing: when any child of a batch is already assigned
/// or unknown, nothing from the call is stored.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    /// Store `team` and every batch in one transaction.
    async fn create_team(
        &self,
        team: &Team,
        batches: &[AssignmentBatch],
    ) -> Result<(), AssignmentRepositoryError>;

    /// Attach a batch of children to an existing team.
    async fn assign(
        &self,
        team_id: Uuid,
        batch: &AssignmentBatch,
    ) -> Result<(), AssignmentRepositoryError>;

    /// Find a team by id.
    async fn find_team(&self, team_id: Uuid) -> Result<Option<Team>, AssignmentRepositoryError>;

    /// Every team, ordered by name.
    async fn list_teams(&self) -> Result<Vec<Team>, AssignmentRepositoryError>;

    /// Remove a team that owns nothing.
    ///
    /// Returns [`AssignmentRepositoryError::TeamInUse`] while assignments
    /// reference it.
    async fn delete_team(&self, team_id: Uuid) -> Result<DeleteOutcome, AssignmentRepositoryError>;

    /// Support users with no team, ordered by id.
    async fn list_unassigned_support_users(
        &self,
    ) -> Result<Vec<UserSummary>, AssignmentRepositoryError>;

    /// Categories with no owning team, ordered by name.
    async fn list_unassigned_categories(
        &self,
    ) -> Result<Vec<CategorySummary>, AssignmentRepositoryError>;

    /// Members of a team, ordered by name.
    async fn team_roster(&self, team_id: Uuid)
    -> Result<Vec<UserSummary>, AssignmentRepositoryError>;

    /// Names of the categories a team owns, ordered by name.
    async fn assigned_category_names(
        &self,
        team_id: Uuid,
    ) -> Result<Vec<String>, AssignmentRepositoryError>;

    /// Name of the team a user belongs to.
    async fn team_name_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<String>, AssignmentRepositoryError>;
}
