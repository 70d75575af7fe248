//! Helpdesk entry-point: loads settings, picks a storage backend and serves
//! the REST API.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

mod server;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use helpdesk::inbound::http::health::HealthState;
use helpdesk::outbound::memory::load_user_seed;
use helpdesk::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use helpdesk::settings::ServerSettings;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load_from_iter(std::env::args_os())
        .map_err(|err| eyre!("failed to load server settings: {err}"))?;
    let config = build_config(&settings).await?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config).wrap_err("failed to start server")?;
    server.await.wrap_err("server terminated with an error")
}

async fn build_config(settings: &ServerSettings) -> Result<ServerConfig> {
    let bind_addr = settings.bind_addr()?;
    let mut config = ServerConfig::new(bind_addr);

    match settings.database_url.as_deref() {
        Some(database_url) => {
            if settings.run_migrations {
                let applied = run_pending_migrations(database_url)
                    .wrap_err("failed to apply database migrations")?;
                info!(applied = ?applied, "migrations complete");
            }
            let pool_config = PoolConfig::new(database_url)
                .with_max_size(settings.pool_max_size())
                .with_connection_timeout(settings.connection_timeout());
            let pool = DbPool::new(pool_config)
                .await
                .wrap_err("failed to create database pool")?;
            config = config.with_db_pool(pool);
        }
        None => {
            if let Some(path) = settings.user_seed_path.as_deref() {
                let users = load_user_seed(path)?;
                info!(count = users.len(), path = %path.display(), "loaded seed users");
                config = config.with_seed_users(users);
            }
        }
    }

    info!(%bind_addr, "helpdesk listening");
    Ok(config)
}
