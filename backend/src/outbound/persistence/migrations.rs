//! Embedded schema migrations.
//!
//! The SQL files under `backend/migrations` are compiled into the binary so
//! the `migrate` tool and the server can bring a database up to date without
//! the Diesel CLI.

use diesel::{Connection, PgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use thiserror::Error;
use tracing::info;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Errors raised while applying migrations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MigrationError {
    /// The database could not be reached.
    #[error("failed to connect for migrations: {message}")]
    Connect { message: String },
    /// A migration failed to apply.
    #[error("database migration failed: {message}")]
    Apply { message: String },
}

/// Apply every pending migration and return the versions that ran.
///
/// # Errors
///
/// Returns [`MigrationError::Connect`] when the URL cannot be opened and
/// [`MigrationError::Apply`] when a migration fails.
///
/// # Examples
///
/// ```rust,no_run
/// use helpdesk::outbound::persistence::run_pending_migrations;
///
/// let applied = run_pending_migrations("postgres://localhost/helpdesk")?;
/// println!("applied {} migrations", applied.len());
/// # Ok::<(), helpdesk::outbound::persistence::MigrationError>(())
/// ```
pub fn run_pending_migrations(database_url: &str) -> Result<Vec<String>, MigrationError> {
    let mut connection =
        PgConnection::establish(database_url).map_err(|error| MigrationError::Connect {
            message: error.to_string(),
        })?;
    let applied = connection
        .run_pending_migrations(MIGRATIONS)
        .map_err(|error| MigrationError::Apply {
            message: error.to_string(),
        })?
        .into_iter()
        .map(|version| version.to_string())
        .collect::<Vec<_>>();
    info!(count = applied.len(), "database migrations applied");
    Ok(applied)
}
