//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use helpdesk::domain::User;
use helpdesk::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) seed_users: Vec<User>,
}

impl ServerConfig {
    /// Construct a configuration that serves from the in-memory store.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            db_pool: None,
            seed_users: Vec::new(),
        }
    }

    /// Attach a database connection pool for the Diesel adapters.
    ///
    /// When provided, every port is served from PostgreSQL and any seed
    /// users are ignored; the users table is the identity provider mirror.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Users to preload into the in-memory store.
    #[must_use]
    pub fn with_seed_users(mut self, users: Vec<User>) -> Self {
        self.seed_users = users;
        self
    }
}
