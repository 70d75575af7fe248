//! Assignment registry service.
//!
//! Implements [`TeamCommand`] and [`TeamQuery`] over an
//! [`AssignmentRepository`] and a [`UserDirectory`]. Member batches are
//! checked against the directory before any write; category existence and
//! the one-team-per-child rules are enforced by the repository inside the
//! write transaction.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::domain::ports::{
    AssignmentRepository, AssignmentRepositoryError, CreateTeamRequest, TeamCommand, TeamQuery,
    UserDirectory, UserDirectoryError,
};
use crate::domain::{
    AssignmentBatch, CategorySummary, CreatedTeam, DeleteOutcome, EntityName, Error, Team,
    UserId, UserSummary,
};

/// Team and assignment use cases.
#[derive(Clone)]
pub struct TeamService<A, U> {
    assignments: Arc<A>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<A, U> TeamService<A, U> {
    /// Create a service over the given ports.
    ///
    /// # Examples
    /// ```
    /// # use std::sync::Arc;
    /// # use mockable::DefaultClock;
    /// use helpdesk::domain::TeamService;
    /// use helpdesk::outbound::memory::InMemoryStore;
    ///
    /// let store = Arc::new(InMemoryStore::default());
    /// let _service = TeamService::new(store.clone(), store, Arc::new(DefaultClock));
    /// ```
    pub fn new(assignments: Arc<A>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            assignments,
            users,
            clock,
        }
    }
}

fn map_assignment_error(error: AssignmentRepositoryError) -> Error {
    match error {
        AssignmentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("assignment repository unavailable: {message}"))
        }
        AssignmentRepositoryError::Query { message } => {
            Error::internal(format!("assignment repository error: {message}"))
        }
        AssignmentRepositoryError::TeamNotFound { team_id } => team_not_found(team_id),
        AssignmentRepositoryError::AlreadyAssigned { kind, child_id } => {
            Error::conflict(format!("{kind} {child_id} is already assigned to a team"))
                .with_details(json!({
                    "kind": kind,
                    "id": child_id,
                    "code": "already_assigned",
                }))
        }
        AssignmentRepositoryError::Contended { kind } => {
            Error::conflict(format!("a {kind} in the request was assigned concurrently"))
                .with_details(json!({ "kind": kind, "code": "already_assigned" }))
        }
        AssignmentRepositoryError::UnknownReference { kind, child_id } => {
            Error::invalid_request(format!("{kind} {child_id} does not exist")).with_details(
                json!({
                    "kind": kind,
                    "id": child_id,
                    "code": "unknown_reference",
                }),
            )
        }
        AssignmentRepositoryError::TeamInUse { team_id } => {
            Error::conflict(format!("team {team_id} still has members or categories"))
                .with_details(json!({ "teamId": team_id, "code": "team_in_use" }))
        }
    }
}

fn map_user_error(error: UserDirectoryError) -> Error {
    match error {
        UserDirectoryError::Connection { message } => {
            Error::service_unavailable(format!("user directory unavailable: {message}"))
        }
        UserDirectoryError::Query { message } => {
            Error::internal(format!("user directory error: {message}"))
        }
    }
}

fn team_not_found(team_id: Uuid) -> Error {
    Error::not_found(format!("team {team_id} not found")).with_details(json!({ "teamId": team_id }))
}

fn member_error(user_id: &UserId, message: String, code: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": "memberIds",
        "value": user_id,
        "code": code,
    }))
}

fn empty_batch_error(field: &str) -> Error {
    Error::invalid_request(format!("{field} must not be empty")).with_details(json!({
        "field": field,
        "code": "empty_list",
    }))
}

impl<A, U> TeamService<A, U>
where
    A: AssignmentRepository,
    U: UserDirectory,
{
    /// Every member must exist and hold the support role.
    async fn ensure_support_users(&self, user_ids: &[UserId]) -> Result<(), Error> {
        for user_id in user_ids {
            let user = self
                .users
                .find_user(user_id)
                .await
                .map_err(map_user_error)?
                .ok_or_else(|| {
                    member_error(
                        user_id,
                        format!("user {user_id} does not exist"),
                        "unknown_user",
                    )
                })?;
            if !user.role.is_support() {
                return Err(member_error(
                    user_id,
                    format!("user {user_id} is not a support user"),
                    "not_support_user",
                ));
            }
        }
        Ok(())
    }

    async fn require_team(&self, team_id: Uuid) -> Result<Team, Error> {
        self.assignments
            .find_team(team_id)
            .await
            .map_err(map_assignment_error)?
            .ok_or_else(|| team_not_found(team_id))
    }
}

#[async_trait]
impl<A, U> TeamCommand for TeamService<A, U>
where
    A: AssignmentRepository,
    U: UserDirectory,
{
    async fn create_team(&self, request: CreateTeamRequest) -> Result<CreatedTeam, Error> {
        let name = EntityName::new(&request.name).map_err(|err| err.into_domain_error())?;
        self.ensure_support_users(&request.member_ids).await?;

        let team = Team::new(name, self.clock.utc());
        let batches: Vec<AssignmentBatch> = [
            AssignmentBatch::members(&request.member_ids),
            AssignmentBatch::categories(request.category_ids),
        ]
        .into_iter()
        .filter(|batch| !batch.is_empty())
        .collect();

        self.assignments
            .create_team(&team, &batches)
            .await
            .map_err(map_assignment_error)?;
        info!(
            team_id = %team.id,
            batches = batches.len(),
            "team created"
        );

        let roster = self
            .assignments
            .team_roster(team.id)
            .await
            .map_err(map_assignment_error)?;
        Ok(CreatedTeam { team, roster })
    }

    async fn add_members(&self, team_id: Uuid, user_ids: Vec<UserId>) -> Result<(), Error> {
        let batch = AssignmentBatch::members(&user_ids);
        if batch.is_empty() {
            return Err(empty_batch_error("memberIds"));
        }
        self.ensure_support_users(&user_ids).await?;
        self.assignments
            .assign(team_id, &batch)
            .await
            .map_err(map_assignment_error)?;
        info!(%team_id, count = batch.child_ids().len(), "members assigned");
        Ok(())
    }

    async fn add_categories(&self, team_id: Uuid, category_ids: Vec<Uuid>) -> Result<(), Error> {
        let batch = AssignmentBatch::categories(category_ids);
        if batch.is_empty() {
            return Err(empty_batch_error("categoryIds"));
        }
        self.assignments
            .assign(team_id, &batch)
            .await
            .map_err(map_assignment_error)?;
        info!(%team_id, count = batch.child_ids().len(), "categories assigned");
        Ok(())
    }

    async fn delete_team(&self, team_id: Uuid) -> Result<DeleteOutcome, Error> {
        let outcome = self
            .assignments
            .delete_team(team_id)
            .await
            .map_err(map_assignment_error)?;
        info!(%team_id, outcome = outcome.message(), "team delete requested");
        Ok(outcome)
    }
}

#[async_trait]
impl<A, U> TeamQuery for TeamService<A, U>
where
    A: AssignmentRepository,
    U: UserDirectory,
{
    async fn list_teams(&self) -> Result<Vec<Team>, Error> {
        self.assignments
            .list_teams()
            .await
            .map_err(map_assignment_error)
    }

    async fn get_team(&self, team_id: Uuid) -> Result<Team, Error> {
        self.require_team(team_id).await
    }

    async fn team_roster(&self, team_id: Uuid) -> Result<Vec<UserSummary>, Error> {
        self.require_team(team_id).await?;
        self.assignments
            .team_roster(team_id)
            .await
            .map_err(map_assignment_error)
    }

    async fn assigned_categories(&self, team_id: Uuid) -> Result<Vec<String>, Error> {
        self.require_team(team_id).await?;
        self.assignments
            .assigned_category_names(team_id)
            .await
            .map_err(map_assignment_error)
    }

    async fn unassigned_support_users(&self) -> Result<Vec<UserSummary>, Error> {
        self.assignments
            .list_unassigned_support_users()
            .await
            .map_err(map_assignment_error)
    }

    async fn unassigned_categories(&self) -> Result<Vec<CategorySummary>, Error> {
        self.assignments
            .list_unassigned_categories()
            .await
            .map_err(map_assignment_error)
    }

    async fn team_name_for_user(&self, user_id: &UserId) -> Result<Option<String>, Error> {
        self.assignments
            .team_name_for_user(user_id)
            .await
            .map_err(map_assignment_error)
    }
}

#[cfg(test)]
#[path = "team_service_tests.rs"]
mod tests;
