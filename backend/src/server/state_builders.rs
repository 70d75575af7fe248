//! Builders for the HTTP state from either storage backend.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use helpdesk::inbound::http::state::{HttpState, HttpStateRepositories};
use helpdesk::outbound::memory::InMemoryStore;
use helpdesk::outbound::persistence::{
    DbPool, DieselAssignmentRepository, DieselCatalogueRepository, DieselTicketRepository,
    DieselUserDirectory,
};

use super::ServerConfig;

fn diesel_state(pool: &DbPool, clock: Arc<dyn Clock>) -> HttpState {
    HttpState::from_repositories(
        HttpStateRepositories {
            assignments: Arc::new(DieselAssignmentRepository::new(pool.clone())),
            tickets: Arc::new(DieselTicketRepository::new(pool.clone())),
            catalogue: Arc::new(DieselCatalogueRepository::new(pool.clone())),
            users: Arc::new(DieselUserDirectory::new(pool.clone())),
        },
        clock,
    )
}

fn memory_state(config: &ServerConfig, clock: Arc<dyn Clock>) -> HttpState {
    let store = Arc::new(InMemoryStore::with_users(config.seed_users.iter().cloned()));
    HttpState::from_repositories(
        HttpStateRepositories {
            assignments: store.clone(),
            tickets: store.clone(),
            catalogue: store.clone(),
            users: store,
        },
        clock,
    )
}

/// Build the HTTP state, preferring PostgreSQL when a pool is configured.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let state = match &config.db_pool {
        Some(pool) => {
            if !config.seed_users.is_empty() {
                warn!(
                    count = config.seed_users.len(),
                    "ignoring seed users; the database users table is authoritative"
                );
            }
            info!("serving from PostgreSQL");
            diesel_state(pool, clock)
        }
        None => {
            info!(
                seed_users = config.seed_users.len(),
                "no database configured; serving from the in-memory store"
            );
            memory_state(config, clock)
        }
    };
    web::Data::new(state)
}
