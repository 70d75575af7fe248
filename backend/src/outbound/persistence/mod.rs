//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain's driven ports backed by
//! PostgreSQL through `diesel-async` and a `bb8` connection pool.
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types. Business rules stay in the domain services.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Atomic writes**: assignment batches run inside one transaction and
//!   ticket acceptance is a single conditional `UPDATE`.
//!
//! # Example
//!
//! ```rust,no_run
//! use helpdesk::outbound::persistence::{DbPool, DieselTicketRepository, PoolConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/helpdesk")).await?;
//! let tickets = DieselTicketRepository::new(pool);
//! # let _ = tickets;
//! # Ok(())
//! # }
//! ```

mod diesel_assignment_repository;
mod diesel_catalogue_repository;
mod diesel_ticket_repository;
mod diesel_user_directory;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_assignment_repository::DieselAssignmentRepository;
pub use diesel_catalogue_repository::DieselCatalogueRepository;
pub use diesel_ticket_repository::DieselTicketRepository;
pub use diesel_user_directory::DieselUserDirectory;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
