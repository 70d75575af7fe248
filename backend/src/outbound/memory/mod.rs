//! In-memory adapter implementing every driven port.
//!
//! [`InMemoryStore`] keeps all state behind one mutex, so each port call is
//! atomic in the same way a single database transaction is: batch
//! assignments are checked in full before anything is written, and the
//! conditional ticket writes compare and set under the lock. The server
//! falls back to this store when no database URL is configured, and the
//! behaviour suites run against it.

mod seed;

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::ports::{
    AssignmentRepository, AssignmentRepositoryError, CatalogueRepository,
    CatalogueRepositoryError, TicketRepository, TicketRepositoryError, UserDirectory,
    UserDirectoryError,
};
use crate::domain::{
    AssignmentBatch, AssignmentKind, Category, CategorySummary, DeleteOutcome, SubCategory,
    SubCategoryListing, SupportType, Team, Ticket, TicketListing, TicketStatus, User, UserId,
    UserSummary,
};

pub use seed::{UserSeedError, load_user_seed, parse_user_seed};

#[derive(Debug, Default)]
struct StoreState {
    users: BTreeMap<UserId, User>,
    teams: HashMap<Uuid, Team>,
    member_of: HashMap<UserId, Uuid>,
    owner_of: HashMap<Uuid, Uuid>,
    categories: HashMap<Uuid, Category>,
    sub_categories: HashMap<Uuid, SubCategory>,
    support_types: HashMap<Uuid, SupportType>,
    tickets: HashMap<Uuid, Ticket>,
}

impl StoreState {
    /// Reject the whole batch if any child is unknown or already owned.
    fn check_batch(&self, batch: &AssignmentBatch) -> Result<(), AssignmentRepositoryError> {
        let kind = batch.kind();
        for child_id in batch.child_ids() {
            let (exists, assigned) = match kind {
                AssignmentKind::Member => {
                    let user_id = UserId::from_uuid(*child_id);
                    (
                        self.users.contains_key(&user_id),
                        self.member_of.contains_key(&user_id),
                    )
                }
                AssignmentKind::Category => (
                    self.categories.contains_key(child_id),
                    self.owner_of.contains_key(child_id),
                ),
            };
            if !exists {
                return Err(AssignmentRepositoryError::unknown_reference(kind, *child_id));
            }
            if assigned {
                return Err(AssignmentRepositoryError::already_assigned(kind, *child_id));
            }
        }
        Ok(())
    }

    fn apply_batch(&mut self, team_id: Uuid, batch: &AssignmentBatch) {
        for child_id in batch.child_ids() {
            match batch.kind() {
                AssignmentKind::Member => {
                    self.member_of.insert(UserId::from_uuid(*child_id), team_id);
                }
                AssignmentKind::Category => {
                    self.owner_of.insert(*child_id, team_id);
                }
            }
        }
    }

    fn roster(&self, team_id: Uuid) -> Vec<UserSummary> {
        let mut roster: Vec<UserSummary> = self
            .member_of
            .iter()
            .filter(|(_, team)| **team == team_id)
            .filter_map(|(user_id, _)| self.users.get(user_id).map(User::summary))
            .collect();
        roster.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        roster
    }

    fn ticket_reference_error(&self, ticket: &Ticket) -> Option<String> {
        if !self.users.contains_key(&ticket.requestor_id) {
            return Some(format!("user {} does not exist", ticket.requestor_id));
        }
        if let Some(assignee) = ticket.assigned_id
            && !self.users.contains_key(&assignee)
        {
            return Some(format!("user {assignee} does not exist"));
        }
        if !self.categories.contains_key(&ticket.category_id) {
            return Some(format!("category {} does not exist", ticket.category_id));
        }
        if !self.sub_categories.contains_key(&ticket.sub_category_id) {
            return Some(format!(
                "sub-category {} does not exist",
                ticket.sub_category_id
            ));
        }
        if !self.support_types.contains_key(&ticket.support_type_id) {
            return Some(format!(
                "support type {} does not exist",
                ticket.support_type_id
            ));
        }
        None
    }
}

/// Process-local store backing all ports.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    /// Create a store pre-populated with identity provider users.
    ///
    /// # Examples
    /// ```
    /// use helpdesk::domain::{User, UserId, UserRole};
    /// use helpdesk::outbound::memory::InMemoryStore;
    ///
    /// let store = InMemoryStore::with_users([User {
    ///     id: UserId::random(),
    ///     name: "Ada".to_owned(),
    ///     role: UserRole::Support,
    ///     image: None,
    /// }]);
    /// # let _ = store;
    /// ```
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let state = StoreState {
            users: users.into_iter().map(|user| (user.id, user)).collect(),
            ..StoreState::default()
        };
        Self {
            state: Mutex::new(state),
        }
    }

    /// Add or replace a user, mirroring an identity provider sync.
    pub fn upsert_user(&self, user: User) -> Result<(), UserDirectoryError> {
        self.lock()?.users.insert(user.id, user);
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreState>, PoisonedStore> {
        self.state.lock().map_err(|_| PoisonedStore)
    }
}

/// A previous holder of the store lock panicked.
struct PoisonedStore;

impl From<PoisonedStore> for AssignmentRepositoryError {
    fn from(_: PoisonedStore) -> Self {
        Self::query("store lock poisoned")
    }
}

impl From<PoisonedStore> for TicketRepositoryError {
    fn from(_: PoisonedStore) -> Self {
        Self::query("store lock poisoned")
    }
}

impl From<PoisonedStore> for CatalogueRepositoryError {
    fn from(_: PoisonedStore) -> Self {
        Self::query("store lock poisoned")
    }
}

impl From<PoisonedStore> for UserDirectoryError {
    fn from(_: PoisonedStore) -> Self {
        Self::query("store lock poisoned")
    }
}

#[async_trait]
impl UserDirectory for InMemoryStore {
    async fn find_user(&self, user_id: &UserId) -> Result<Option<User>, UserDirectoryError> {
        Ok(self.lock()?.users.get(user_id).cloned())
    }
}

#[async_trait]
impl AssignmentRepository for InMemoryStore {
    async fn create_team(
        &self,
        team: &Team,
        batches: &[AssignmentBatch],
    ) -> Result<(), AssignmentRepositoryError> {
        let mut state = self.lock()?;
        for batch in batches {
            state.check_batch(batch)?;
        }
        state.teams.insert(team.id, team.clone());
        for batch in batches {
            state.apply_batch(team.id, batch);
        }
        Ok(())
    }

    async fn assign(
        &self,
        team_id: Uuid,
        batch: &AssignmentBatch,
    ) -> Result<(), AssignmentRepositoryError> {
        let mut state = self.lock()?;
        if !state.teams.contains_key(&team_id) {
            return Err(AssignmentRepositoryError::team_not_found(team_id));
        }
        state.check_batch(batch)?;
        state.apply_batch(team_id, batch);
        Ok(())
    }

    async fn find_team(&self, team_id: Uuid) -> Result<Option<Team>, AssignmentRepositoryError> {
        Ok(self.lock()?.teams.get(&team_id).cloned())
    }

    async fn list_teams(&self) -> Result<Vec<Team>, AssignmentRepositoryError> {
        let mut teams: Vec<Team> = self.lock()?.teams.values().cloned().collect();
        teams.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(teams)
    }

    async fn delete_team(&self, team_id: Uuid) -> Result<DeleteOutcome, AssignmentRepositoryError> {
        let mut state = self.lock()?;
        if !state.teams.contains_key(&team_id) {
            return Ok(DeleteOutcome::NoRowsAffected);
        }
        let in_use = state.member_of.values().any(|team| *team == team_id)
            || state.owner_of.values().any(|team| *team == team_id);
        if in_use {
            return Err(AssignmentRepositoryError::team_in_use(team_id));
        }
        state.teams.remove(&team_id);
        Ok(DeleteOutcome::Deleted)
    }

    async fn list_unassigned_support_users(
        &self,
    ) -> Result<Vec<UserSummary>, AssignmentRepositoryError> {
        let state = self.lock()?;
        Ok(state
            .users
            .values()
            .filter(|user| user.role.is_support() && !state.member_of.contains_key(&user.id))
            .map(User::summary)
            .collect())
    }

    async fn list_unassigned_categories(
        &self,
    ) -> Result<Vec<CategorySummary>, AssignmentRepositoryError> {
        let state = self.lock()?;
        let mut unassigned: Vec<CategorySummary> = state
            .categories
            .values()
            .filter(|category| !state.owner_of.contains_key(&category.id))
            .map(|category| CategorySummary {
                id: category.id,
                name: category.name.clone(),
            })
            .collect();
        unassigned.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(unassigned)
    }

    async fn team_roster(
        &self,
        team_id: Uuid,
    ) -> Result<Vec<UserSummary>, AssignmentRepositoryError> {
        Ok(self.lock()?.roster(team_id))
    }

    async fn assigned_category_names(
        &self,
        team_id: Uuid,
    ) -> Result<Vec<String>, AssignmentRepositoryError> {
        let state = self.lock()?;
        let mut names: Vec<String> = state
            .owner_of
            .iter()
            .filter(|(_, team)| **team == team_id)
            .filter_map(|(category_id, _)| state.categories.get(category_id))
            .map(|category| category.name.clone())
            .collect();
        names.sort();
        Ok(names)
    }

    async fn team_name_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<String>, AssignmentRepositoryError> {
        let state = self.lock()?;
        Ok(state
            .member_of
            .get(user_id)
            .and_then(|team_id| state.teams.get(team_id))
            .map(|team| team.name.clone()))
    }
}

#[async_trait]
impl TicketRepository for InMemoryStore {
    async fn insert(&self, ticket: &Ticket) -> Result<(), TicketRepositoryError> {
        let mut state = self.lock()?;
        if let Some(message) = state.ticket_reference_error(ticket) {
            return Err(TicketRepositoryError::unknown_reference(message));
        }
        state.tickets.insert(ticket.id, ticket.clone());
        Ok(())
    }

    async fn find_by_id(&self, ticket_id: Uuid) -> Result<Option<Ticket>, TicketRepositoryError> {
        Ok(self.lock()?.tickets.get(&ticket_id).cloned())
    }

    async fn accept(
        &self,
        ticket_id: Uuid,
        assignee: &UserId,
        at: DateTime<Utc>,
    ) -> Result<Option<Ticket>, TicketRepositoryError> {
        let mut state = self.lock()?;
        if !state.users.contains_key(assignee) {
            return Err(TicketRepositoryError::unknown_reference(format!(
                "user {assignee} does not exist"
            )));
        }
        let Some(ticket) = state.tickets.get_mut(&ticket_id) else {
            return Ok(None);
        };
        if ticket.status != TicketStatus::Open || ticket.assigned_id.is_some() {
            return Ok(None);
        }
        ticket.assigned_id = Some(*assignee);
        ticket.status = TicketStatus::Ongoing;
        ticket.updated_at = at;
        Ok(Some(ticket.clone()))
    }

    async fn update_fields(&self, ticket: &Ticket) -> Result<Option<Ticket>, TicketRepositoryError> {
        let mut state = self.lock()?;
        if !state.tickets.contains_key(&ticket.id) {
            return Ok(None);
        }
        if let Some(message) = state.ticket_reference_error(ticket) {
            return Err(TicketRepositoryError::unknown_reference(message));
        }
        let Some(stored) = state.tickets.get_mut(&ticket.id) else {
            return Ok(None);
        };
        stored.category_id = ticket.category_id;
        stored.sub_category_id = ticket.sub_category_id;
        stored.support_type_id = ticket.support_type_id;
        stored.details.clone_from(&ticket.details);
        stored.updated_at = ticket.updated_at;
        Ok(Some(stored.clone()))
    }

    async fn transition(
        &self,
        ticket_id: Uuid,
        from: TicketStatus,
        to: TicketStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<Ticket>, TicketRepositoryError> {
        let mut state = self.lock()?;
        let Some(ticket) = state.tickets.get_mut(&ticket_id) else {
            return Ok(None);
        };
        if ticket.status != from {
            return Ok(None);
        }
        ticket.status = to;
        ticket.updated_at = at;
        Ok(Some(ticket.clone()))
    }

    async fn delete(&self, ticket_id: Uuid) -> Result<DeleteOutcome, TicketRepositoryError> {
        let removed = self.lock()?.tickets.remove(&ticket_id);
        Ok(DeleteOutcome::from_affected_rows(usize::from(removed.is_some())))
    }

    async fn list_listings(&self) -> Result<Vec<TicketListing>, TicketRepositoryError> {
        let state = self.lock()?;
        let mut listings: Vec<(DateTime<Utc>, TicketListing)> = state
            .tickets
            .values()
            .filter_map(|ticket| {
                let requester = state.users.get(&ticket.requestor_id)?;
                let assignee = ticket
                    .assigned_id
                    .and_then(|id| state.users.get(&id));
                Some((
                    ticket.created_at,
                    TicketListing {
                        id: ticket.id,
                        requested_by: requester.name.clone(),
                        requested_by_avatar: requester.image.clone(),
                        assigned_to: assignee.map(|user| user.name.clone()),
                        assigned_to_avatar: assignee.and_then(|user| user.image.clone()),
                        details: ticket.details.clone(),
                        status: ticket.status,
                        created_at: ticket.created_at,
                        updated_at: ticket.updated_at,
                    },
                ))
            })
            .collect();
        listings.sort_by(|(a_at, a), (b_at, b)| b_at.cmp(a_at).then(a.id.cmp(&b.id)));
        Ok(listings.into_iter().map(|(_, listing)| listing).collect())
    }
}

#[async_trait]
impl CatalogueRepository for InMemoryStore {
    async fn list_categories(&self) -> Result<Vec<Category>, CatalogueRepositoryError> {
        let mut categories: Vec<Category> = self.lock()?.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn find_category(&self, id: Uuid) -> Result<Option<Category>, CatalogueRepositoryError> {
        Ok(self.lock()?.categories.get(&id).cloned())
    }

    async fn insert_category(&self, category: &Category) -> Result<(), CatalogueRepositoryError> {
        let mut state = self.lock()?;
        if state
            .categories
            .values()
            .any(|existing| existing.name == category.name)
        {
            return Err(CatalogueRepositoryError::duplicate_name(category.name.clone()));
        }
        state.categories.insert(category.id, category.clone());
        Ok(())
    }

    async fn list_sub_categories(
        &self,
    ) -> Result<Vec<SubCategoryListing>, CatalogueRepositoryError> {
        let state = self.lock()?;
        let mut listings: Vec<SubCategoryListing> = state
            .sub_categories
            .values()
            .filter_map(|sub| {
                let parent = state.categories.get(&sub.category_id)?;
                Some(SubCategoryListing {
                    id: sub.id,
                    name: sub.name.clone(),
                    category: parent.name.clone(),
                    description: sub.description.clone(),
                    created_at: sub.created_at,
                    updated_at: sub.updated_at,
                })
            })
            .collect();
        listings.sort_by(|a, b| a.category.cmp(&b.category).then(a.name.cmp(&b.name)));
        Ok(listings)
    }

    async fn find_sub_category(
        &self,
        id: Uuid,
    ) -> Result<Option<SubCategory>, CatalogueRepositoryError> {
        Ok(self.lock()?.sub_categories.get(&id).cloned())
    }

    async fn insert_sub_category(
        &self,
        sub_category: &SubCategory,
    ) -> Result<(), CatalogueRepositoryError> {
        let mut state = self.lock()?;
        if !state.categories.contains_key(&sub_category.category_id) {
            return Err(CatalogueRepositoryError::unknown_category(
                sub_category.category_id,
            ));
        }
        if state.sub_categories.values().any(|existing| {
            existing.category_id == sub_category.category_id && existing.name == sub_category.name
        }) {
            return Err(CatalogueRepositoryError::duplicate_name(
                sub_category.name.clone(),
            ));
        }
        state
            .sub_categories
            .insert(sub_category.id, sub_category.clone());
        Ok(())
    }

    async fn list_support_types(&self) -> Result<Vec<SupportType>, CatalogueRepositoryError> {
        let mut types: Vec<SupportType> = self.lock()?.support_types.values().cloned().collect();
        types.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(types)
    }

    async fn find_support_type(
        &self,
        id: Uuid,
    ) -> Result<Option<SupportType>, CatalogueRepositoryError> {
        Ok(self.lock()?.support_types.get(&id).cloned())
    }

    async fn insert_support_type(
        &self,
        support_type: &SupportType,
    ) -> Result<(), CatalogueRepositoryError> {
        let mut state = self.lock()?;
        if state
            .support_types
            .values()
            .any(|existing| existing.name == support_type.name)
        {
            return Err(CatalogueRepositoryError::duplicate_name(
                support_type.name.clone(),
            ));
        }
        state
            .support_types
            .insert(support_type.id, support_type.clone());
        Ok(())
    }
}
