//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use crate::domain::ports::{
    MockCatalogueCommand, MockCatalogueQuery, MockTeamCommand, MockTeamQuery, MockTicketCommand,
    MockTicketQuery,
};
use crate::inbound::http::state::HttpState;

/// State whose ports are mocks without expectations.
///
/// Tests replace the ports they exercise; any call reaching an untouched mock
/// panics, which flags handlers calling the wrong port.
pub fn mock_state() -> HttpState {
    HttpState {
        teams: Arc::new(MockTeamCommand::new()),
        teams_query: Arc::new(MockTeamQuery::new()),
        tickets: Arc::new(MockTicketCommand::new()),
        tickets_query: Arc::new(MockTicketQuery::new()),
        catalogue: Arc::new(MockCatalogueCommand::new()),
        catalogue_query: Arc::new(MockCatalogueQuery::new()),
    }
}
