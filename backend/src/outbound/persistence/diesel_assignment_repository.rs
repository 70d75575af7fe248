//! PostgreSQL-backed `AssignmentRepository` implementation.
//!
//! Batch writes run in one transaction: existence and ownership of every
//! child are checked first, then all rows are inserted. The unique
//! constraints on `team_assignments.user_id` and
//! `category_assignments.category_id` settle races the pre-check cannot see.
//! After the losing transaction rolls back, the batch is re-read so the
//! error still names the child that was taken.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{AssignmentRepository, AssignmentRepositoryError};
use crate::domain::{
    AssignmentBatch, AssignmentKind, CategorySummary, DeleteOutcome, Team, UserId, UserSummary,
};

use super::error_mapping::{DieselFailure, classify_diesel_error, pool_error_message};
use super::models::{NewCategoryAssignmentRow, NewTeamAssignmentRow, TeamRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{categories, category_assignments, team_assignments, teams, users};

const MEMBER_UNIQUE_CONSTRAINT: &str = "team_assignments_user_id_key";
const CATEGORY_UNIQUE_CONSTRAINT: &str = "category_assignments_category_id_key";
const SUPPORT_ROLE: &str = "support";

/// Diesel-backed implementation of the [`AssignmentRepository`] port.
#[derive(Clone)]
pub struct DieselAssignmentRepository {
    pool: DbPool,
}

impl DieselAssignmentRepository {
    /// Create a repository over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Error type threaded through assignment transactions.
#[derive(Debug)]
enum AssignmentTxError {
    Diesel(diesel::result::Error),
    Domain(AssignmentRepositoryError),
}

impl From<diesel::result::Error> for AssignmentTxError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

impl From<AssignmentRepositoryError> for AssignmentTxError {
    fn from(error: AssignmentRepositoryError) -> Self {
        Self::Domain(error)
    }
}

fn map_pool_error(error: PoolError) -> AssignmentRepositoryError {
    AssignmentRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> AssignmentRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::Connection => {
            AssignmentRepositoryError::connection("database connection error")
        }
        DieselFailure::UniqueViolation { constraint } => match constraint.as_deref() {
            Some(MEMBER_UNIQUE_CONSTRAINT) => {
                AssignmentRepositoryError::contended(AssignmentKind::Member)
            }
            Some(CATEGORY_UNIQUE_CONSTRAINT) => {
                AssignmentRepositoryError::contended(AssignmentKind::Category)
            }
            _ => AssignmentRepositoryError::query("unexpected unique violation"),
        },
        DieselFailure::ForeignKeyViolation { .. } => {
            AssignmentRepositoryError::query("a referenced row was removed during the write")
        }
        DieselFailure::Query(message) => AssignmentRepositoryError::query(message),
    }
}

fn map_tx_error(error: AssignmentTxError) -> AssignmentRepositoryError {
    match error {
        AssignmentTxError::Diesel(error) => map_diesel_error(error),
        AssignmentTxError::Domain(error) => error,
    }
}

/// First requested id that is absent from `found`, in request order.
fn first_missing(requested: &[Uuid], found: &[Uuid]) -> Option<Uuid> {
    requested.iter().find(|id| !found.contains(id)).copied()
}

/// First requested id that is present in `taken`, in request order.
fn first_taken(requested: &[Uuid], taken: &[Uuid]) -> Option<Uuid> {
    requested.iter().find(|id| taken.contains(id)).copied()
}

/// Children of `kind` among `child_ids` that already belong to a team.
async fn taken_children(
    conn: &mut AsyncPgConnection,
    kind: AssignmentKind,
    child_ids: &[Uuid],
) -> Result<Vec<Uuid>, diesel::result::Error> {
    match kind {
        AssignmentKind::Member => {
            team_assignments::table
                .filter(team_assignments::user_id.eq_any(child_ids.to_vec()))
                .select(team_assignments::user_id)
                .load(conn)
                .await
        }
        AssignmentKind::Category => {
            category_assignments::table
                .filter(category_assignments::category_id.eq_any(child_ids.to_vec()))
                .select(category_assignments::category_id)
                .load(conn)
                .await
        }
    }
}

/// Replace a bare contention error with the child that won the race.
///
/// Runs after the failed transaction has rolled back, so the lookup sees the
/// committed assignment that tripped the unique constraint.
async fn name_contended_child(
    conn: &mut AsyncPgConnection,
    batches: &[AssignmentBatch],
    error: AssignmentRepositoryError,
) -> AssignmentRepositoryError {
    let AssignmentRepositoryError::Contended { kind } = error else {
        return error;
    };
    let Some(batch) = batches.iter().find(|batch| batch.kind() == kind) else {
        return error;
    };
    match taken_children(conn, kind, batch.child_ids()).await {
        Ok(taken) => first_taken(batch.child_ids(), &taken).map_or(error, |child_id| {
            AssignmentRepositoryError::already_assigned(kind, child_id)
        }),
        Err(lookup_error) => {
            debug!(error = %lookup_error, "could not re-read contended assignments");
            error
        }
    }
}

async fn write_member_batch(
    conn: &mut AsyncPgConnection,
    team_id: Uuid,
    user_ids: &[Uuid],
) -> Result<(), AssignmentTxError> {
    let known: Vec<Uuid> = users::table
        .filter(users::id.eq_any(user_ids.to_vec()))
        .select(users::id)
        .load(conn)
        .await?;
    if let Some(missing) = first_missing(user_ids, &known) {
        return Err(AssignmentRepositoryError::unknown_reference(AssignmentKind::Member, missing).into());
    }

    let taken = taken_children(conn, AssignmentKind::Member, user_ids).await?;
    if let Some(assigned) = first_taken(user_ids, &taken) {
        return Err(
            AssignmentRepositoryError::already_assigned(AssignmentKind::Member, assigned).into(),
        );
    }

    let rows: Vec<NewTeamAssignmentRow> = user_ids
        .iter()
        .map(|user_id| NewTeamAssignmentRow {
            team_id,
            user_id: *user_id,
        })
        .collect();
    diesel::insert_into(team_assignments::table)
        .values(&rows)
        .execute(conn)
        .await?;
    Ok(())
}

async fn write_category_batch(
    conn: &mut AsyncPgConnection,
    team_id: Uuid,
    category_ids: &[Uuid],
) -> Result<(), AssignmentTxError> {
    let known: Vec<Uuid> = categories::table
        .filter(categories::id.eq_any(category_ids.to_vec()))
        .select(categories::id)
        .load(conn)
        .await?;
    if let Some(missing) = first_missing(category_ids, &known) {
        return Err(
            AssignmentRepositoryError::unknown_reference(AssignmentKind::Category, missing).into(),
        );
    }

    let taken = taken_children(conn, AssignmentKind::Category, category_ids).await?;
    if let Some(assigned) = first_taken(category_ids, &taken) {
        return Err(
            AssignmentRepositoryError::already_assigned(AssignmentKind::Category, assigned).into(),
        );
    }

    let rows: Vec<NewCategoryAssignmentRow> = category_ids
        .iter()
        .map(|category_id| NewCategoryAssignmentRow {
            team_id,
            category_id: *category_id,
        })
        .collect();
    diesel::insert_into(category_assignments::table)
        .values(&rows)
        .execute(conn)
        .await?;
    Ok(())
}

/// Write one batch; the single primitive behind team creation and additions.
async fn write_batch(
    conn: &mut AsyncPgConnection,
    team_id: Uuid,
    batch: &AssignmentBatch,
) -> Result<(), AssignmentTxError> {
    if batch.is_empty() {
        return Ok(());
    }
    match batch.kind() {
        AssignmentKind::Member => write_member_batch(conn, team_id, batch.child_ids()).await,
        AssignmentKind::Category => write_category_batch(conn, team_id, batch.child_ids()).await,
    }
}

#[async_trait]
impl AssignmentRepository for DieselAssignmentRepository {
    async fn create_team(
        &self,
        team: &Team,
        batches: &[AssignmentBatch],
    ) -> Result<(), AssignmentRepositoryError> {
        let row = TeamRow::from(team);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let result = conn
            .transaction::<_, AssignmentTxError, _>(|conn| {
                async move {
                    diesel::insert_into(teams::table)
                        .values(&row)
                        .execute(conn)
                        .await?;
                    for batch in batches {
                        write_batch(conn, row.id, batch).await?;
                    }
                    Ok(())
                }
                .scope_boxed()
            })
            .await;
        match result {
            Ok(()) => Ok(()),
            Err(error) => Err(name_contended_child(&mut conn, batches, map_tx_error(error)).await),
        }
    }

    async fn assign(
        &self,
        team_id: Uuid,
        batch: &AssignmentBatch,
    ) -> Result<(), AssignmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let result = conn
            .transaction::<_, AssignmentTxError, _>(|conn| {
                async move {
                    let exists: Option<Uuid> = teams::table
                        .filter(teams::id.eq(team_id))
                        .select(teams::id)
                        .first(conn)
                        .await
                        .optional()?;
                    if exists.is_none() {
                        return Err(AssignmentRepositoryError::team_not_found(team_id).into());
                    }
                    write_batch(conn, team_id, batch).await
                }
                .scope_boxed()
            })
            .await;
        match result {
            Ok(()) => Ok(()),
            Err(error) => {
                let error = map_tx_error(error);
                Err(name_contended_child(&mut conn, std::slice::from_ref(batch), error).await)
            }
        }
    }

    async fn find_team(&self, team_id: Uuid) -> Result<Option<Team>, AssignmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        teams::table
            .filter(teams::id.eq(team_id))
            .select(TeamRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map(|row| row.map(Team::from))
            .map_err(map_diesel_error)
    }

    async fn list_teams(&self) -> Result<Vec<Team>, AssignmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TeamRow> = teams::table
            .order((teams::name.asc(), teams::id.asc()))
            .select(TeamRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Team::from).collect())
    }

    async fn delete_team(&self, team_id: Uuid) -> Result<DeleteOutcome, AssignmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // The RESTRICT foreign keys reject the delete while assignments remain.
        let deleted = diesel::delete(teams::table.filter(teams::id.eq(team_id)))
            .execute(&mut conn)
            .await
            .map_err(|error| match classify_diesel_error(error) {
                DieselFailure::ForeignKeyViolation { .. } => {
                    AssignmentRepositoryError::team_in_use(team_id)
                }
                DieselFailure::Connection => {
                    AssignmentRepositoryError::connection("database connection error")
                }
                DieselFailure::Query(message) => AssignmentRepositoryError::query(message),
                DieselFailure::UniqueViolation { .. } => {
                    AssignmentRepositoryError::query("unexpected unique violation")
                }
            })?;
        Ok(DeleteOutcome::from_affected_rows(deleted))
    }

    async fn list_unassigned_support_users(
        &self,
    ) -> Result<Vec<UserSummary>, AssignmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = users::table
            .left_join(team_assignments::table)
            .filter(users::role.eq(SUPPORT_ROLE))
            .filter(team_assignments::id.nullable().is_null())
            .order(users::id.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(UserSummary::from).collect())
    }

    async fn list_unassigned_categories(
        &self,
    ) -> Result<Vec<CategorySummary>, AssignmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(Uuid, String)> = categories::table
            .left_join(category_assignments::table)
            .filter(category_assignments::id.nullable().is_null())
            .order(categories::name.asc())
            .select((categories::id, categories::name))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows
            .into_iter()
            .map(|(id, name)| CategorySummary { id, name })
            .collect())
    }

    async fn team_roster(
        &self,
        team_id: Uuid,
    ) -> Result<Vec<UserSummary>, AssignmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = users::table
            .inner_join(team_assignments::table)
            .filter(team_assignments::team_id.eq(team_id))
            .order((users::name.asc(), users::id.asc()))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(UserSummary::from).collect())
    }

    async fn assigned_category_names(
        &self,
        team_id: Uuid,
    ) -> Result<Vec<String>, AssignmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        categories::table
            .inner_join(category_assignments::table)
            .filter(category_assignments::team_id.eq(team_id))
            .order(categories::name.asc())
            .select(categories::name)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn team_name_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<String>, AssignmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        teams::table
            .inner_join(team_assignments::table)
            .filter(team_assignments::user_id.eq(*user_id.as_uuid()))
            .select(teams::name)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)
    }
}
