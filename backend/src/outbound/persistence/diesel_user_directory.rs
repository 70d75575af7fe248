//! PostgreSQL-backed `UserDirectory` reading the mirrored users table.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserDirectory, UserDirectoryError};
use crate::domain::{User, UserId};

use super::error_mapping::{DieselFailure, classify_diesel_error, pool_error_message};
use super::models::UserRow;
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the [`UserDirectory`] port.
#[derive(Clone)]
pub struct DieselUserDirectory {
    pool: DbPool,
}

impl DieselUserDirectory {
    /// Create a directory over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserDirectoryError {
    UserDirectoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> UserDirectoryError {
    match classify_diesel_error(error) {
        DieselFailure::Connection => UserDirectoryError::connection("database connection error"),
        DieselFailure::Query(message) => UserDirectoryError::query(message),
        DieselFailure::UniqueViolation { .. } | DieselFailure::ForeignKeyViolation { .. } => {
            UserDirectoryError::query("unexpected constraint violation")
        }
    }
}

#[async_trait]
impl UserDirectory for DieselUserDirectory {
    async fn find_user(&self, user_id: &UserId) -> Result<Option<User>, UserDirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        users::table
            .filter(users::id.eq(*user_id.as_uuid()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map(|row| row.map(User::from))
            .map_err(map_diesel_error)
    }
}
