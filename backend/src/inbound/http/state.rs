//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    AssignmentRepository, CatalogueCommand, CatalogueQuery, CatalogueRepository, TeamCommand,
    TeamQuery, TicketCommand, TicketQuery, TicketRepository, UserDirectory,
};
use crate::domain::{CatalogueService, TeamService, TicketService};

/// Driven adapters the HTTP state is assembled from.
pub struct HttpStateRepositories<A, T, C, U> {
    pub assignments: Arc<A>,
    pub tickets: Arc<T>,
    pub catalogue: Arc<C>,
    pub users: Arc<U>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub teams: Arc<dyn TeamCommand>,
    pub teams_query: Arc<dyn TeamQuery>,
    pub tickets: Arc<dyn TicketCommand>,
    pub tickets_query: Arc<dyn TicketQuery>,
    pub catalogue: Arc<dyn CatalogueCommand>,
    pub catalogue_query: Arc<dyn CatalogueQuery>,
}

impl HttpState {
    /// Wire the domain services over one set of driven adapters.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use helpdesk::inbound::http::state::{HttpState, HttpStateRepositories};
    /// use helpdesk::outbound::memory::InMemoryStore;
    /// use mockable::DefaultClock;
    ///
    /// let store = Arc::new(InMemoryStore::default());
    /// let state = HttpState::from_repositories(
    ///     HttpStateRepositories {
    ///         assignments: store.clone(),
    ///         tickets: store.clone(),
    ///         catalogue: store.clone(),
    ///         users: store,
    ///     },
    ///     Arc::new(DefaultClock),
    /// );
    /// let _teams = state.teams_query.clone();
    /// ```
    pub fn from_repositories<A, T, C, U>(
        repositories: HttpStateRepositories<A, T, C, U>,
        clock: Arc<dyn Clock>,
    ) -> Self
    where
        A: AssignmentRepository + 'static,
        T: TicketRepository + 'static,
        C: CatalogueRepository + 'static,
        U: UserDirectory + 'static,
    {
        let HttpStateRepositories {
            assignments,
            tickets,
            catalogue,
            users,
        } = repositories;
        let teams = Arc::new(TeamService::new(assignments, users.clone(), clock.clone()));
        let ticket_service = Arc::new(TicketService::new(
            tickets,
            users,
            catalogue.clone(),
            clock.clone(),
        ));
        let catalogue_service = Arc::new(CatalogueService::new(catalogue, clock));
        Self {
            teams: teams.clone(),
            teams_query: teams,
            tickets: ticket_service.clone(),
            tickets_query: ticket_service,
            catalogue: catalogue_service.clone(),
            catalogue_query: catalogue_service,
        }
    }
}
