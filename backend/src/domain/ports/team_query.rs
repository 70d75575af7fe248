//! Driving port for assignment registry projections.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{CategorySummary, Error, Team, UserId, UserSummary};

/// Read-only use cases over teams and their assignments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TeamQuery: Send + Sync {
    /// Every team, ordered by name.
    async fn list_teams(&self) -> Result<Vec<Team>, Error>;

    /// One team; `not_found` when absent.
    async fn get_team(&self, team_id: Uuid) -> Result<Team, Error>;

    /// Members of a team; `not_found` when the team is absent.
    async fn team_roster(&self, team_id: Uuid) -> Result<Vec<UserSummary>, Error>;

    /// Category names owned by a team; `not_found` when the team is absent.
    async fn assigned_categories(&self, team_id: Uuid) -> Result<Vec<String>, Error>;

    /// Support users without a team, ordered by id.
    async fn unassigned_support_users(&self) -> Result<Vec<UserSummary>, Error>;

    /// Categories without an owning team, ordered by name.
    async fn unassigned_categories(&self) -> Result<Vec<CategorySummary>, Error>;

    /// Name of the user's team, if any.
    async fn team_name_for_user(&self, user_id: &UserId) -> Result<Option<String>, Error>;
}
