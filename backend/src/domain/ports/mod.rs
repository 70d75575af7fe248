//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`UserDirectory`]) describe what the domain
//! needs from storage and expose typed errors built with
//! `define_port_error!`. Driving ports (`*Command`, `*Query`) are the use
//! cases inbound adapters call; they return the shared domain [`Error`].
//!
//! [`Error`]: crate::domain::Error

mod macros;
pub(crate) use macros::define_port_error;

mod assignment_repository;
mod catalogue_command;
mod catalogue_query;
mod catalogue_repository;
mod team_command;
mod team_query;
mod ticket_command;
mod ticket_query;
mod ticket_repository;
mod user_directory;

#[cfg(test)]
pub use assignment_repository::MockAssignmentRepository;
pub use assignment_repository::{AssignmentRepository, AssignmentRepositoryError};
#[cfg(test)]
pub use catalogue_command::MockCatalogueCommand;
pub use catalogue_command::{CatalogueCommand, CatalogueEntryRequest};
#[cfg(test)]
pub use catalogue_query::MockCatalogueQuery;
pub use catalogue_query::CatalogueQuery;
#[cfg(test)]
pub use catalogue_repository::MockCatalogueRepository;
pub use catalogue_repository::{CatalogueRepository, CatalogueRepositoryError};
#[cfg(test)]
pub use team_command::MockTeamCommand;
pub use team_command::{CreateTeamRequest, TeamCommand};
#[cfg(test)]
pub use team_query::MockTeamQuery;
pub use team_query::TeamQuery;
#[cfg(test)]
pub use ticket_command::MockTicketCommand;
pub use ticket_command::TicketCommand;
#[cfg(test)]
pub use ticket_query::MockTicketQuery;
pub use ticket_query::TicketQuery;
#[cfg(test)]
pub use ticket_repository::MockTicketRepository;
pub use ticket_repository::{TicketRepository, TicketRepositoryError};
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::{UserDirectory, UserDirectoryError};
