//! Scenario world shared by the helpdesk behaviour suites.
//!
//! Scenarios drive the real domain services through the driving ports held
//! in [`HttpState`], backed by the in-memory store. Steps are synchronous,
//! so the world owns a Tokio runtime and blocks on each port call.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use helpdesk::domain::ports::CatalogueEntryRequest;
use helpdesk::domain::{DeleteOutcome, Error, ErrorCode, User, UserId, UserRole};
use helpdesk::inbound::http::state::{HttpState, HttpStateRepositories};
use helpdesk::outbound::memory::InMemoryStore;
use mockable::DefaultClock;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, then};
use tokio::runtime::Runtime;
use uuid::Uuid;

/// Runtime plus the wired ports; cloned cheaply into each step.
#[derive(Clone)]
pub struct Harness {
    runtime: Arc<Runtime>,
    store: Arc<InMemoryStore>,
    pub state: HttpState,
}

impl Harness {
    fn new() -> Self {
        let store = Arc::new(InMemoryStore::default());
        let state = HttpState::from_repositories(
            HttpStateRepositories {
                assignments: store.clone(),
                tickets: store.clone(),
                catalogue: store.clone(),
                users: store.clone(),
            },
            Arc::new(DefaultClock),
        );
        Self {
            runtime: Arc::new(Runtime::new().expect("create runtime")),
            store,
            state,
        }
    }

    pub fn block_on<F: Future>(&self, fut: F) -> F::Output {
        self.runtime.block_on(fut)
    }
}

#[derive(Default, ScenarioState)]
pub struct HelpdeskWorld {
    harness: Slot<Harness>,
    users: Slot<HashMap<String, UserId>>,
    entities: Slot<HashMap<String, Uuid>>,
    pub ticket_id: Slot<Uuid>,
    pub last_error: Slot<Error>,
    pub last_delete: Slot<DeleteOutcome>,
}

impl HelpdeskWorld {
    pub fn harness(&self) -> Harness {
        if let Some(harness) = self.harness.get() {
            return harness;
        }
        let harness = Harness::new();
        self.harness.set(harness.clone());
        harness
    }

    pub fn add_user(&self, name: &str, role: UserRole) {
        let user = User {
            id: UserId::random(),
            name: name.to_owned(),
            role,
            image: None,
        };
        let mut users = self.users.get().unwrap_or_default();
        users.insert(name.to_owned(), user.id);
        self.users.set(users);
        self.harness()
            .store
            .upsert_user(user)
            .expect("store accepts user");
    }

    pub fn user(&self, name: &str) -> UserId {
        self.users
            .get()
            .and_then(|users| users.get(name).copied())
            .unwrap_or_else(|| panic!("unknown user {name}"))
    }

    /// Remember a team or catalogue entry by its display name.
    pub fn remember(&self, name: &str, id: Uuid) {
        let mut entities = self.entities.get().unwrap_or_default();
        entities.insert(name.to_owned(), id);
        self.entities.set(entities);
    }

    pub fn entity(&self, name: &str) -> Uuid {
        self.entities
            .get()
            .and_then(|entities| entities.get(name).copied())
            .unwrap_or_else(|| panic!("unknown entity {name}"))
    }

    /// Keep the success value, or stash the error for a later `then` step.
    pub fn record<T>(&self, result: Result<T, Error>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.last_error.set(error);
                None
            }
        }
    }

    pub fn create_category(&self, name: &str) -> Uuid {
        let harness = self.harness();
        let category = harness
            .block_on(harness.state.catalogue.create_category(entry(name)))
            .expect("category created");
        self.remember(name, category.id);
        category.id
    }

    fn assert_rejected(&self, expected: ErrorCode) {
        let error = self.last_error.get().expect("an error was recorded");
        assert_eq!(error.code(), expected, "unexpected error: {}", error.message());
    }
}

pub fn entry(name: &str) -> CatalogueEntryRequest {
    CatalogueEntryRequest {
        name: name.to_owned(),
        description: None,
    }
}

#[given("support users {first} and {second}")]
fn support_users(world: &HelpdeskWorld, first: String, second: String) {
    world.add_user(&first, UserRole::Support);
    world.add_user(&second, UserRole::Support);
}

#[given("a requestor named {name}")]
fn a_requestor_named(world: &HelpdeskWorld, name: String) {
    world.add_user(&name, UserRole::Other("staff".to_owned()));
}

#[then("the request is rejected as a conflict")]
fn the_request_is_rejected_as_a_conflict(world: &HelpdeskWorld) {
    world.assert_rejected(ErrorCode::Conflict);
}

#[then("the request is rejected as invalid")]
fn the_request_is_rejected_as_invalid(world: &HelpdeskWorld) {
    world.assert_rejected(ErrorCode::InvalidRequest);
}
