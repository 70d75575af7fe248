//! Outbound adapters implementing the domain's driven ports.
//!
//! - **memory**: a mutex-guarded store for local runs and tests
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//!
//! Adapters translate between domain types and storage representations and
//! contain no business rules.

pub mod memory;
pub mod persistence;
