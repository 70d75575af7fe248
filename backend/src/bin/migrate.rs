//! Apply pending database migrations and print the applied versions.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use helpdesk::outbound::persistence::run_pending_migrations;

/// `migrate` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "migrate",
    about = "Apply pending helpdesk schema migrations",
    version
)]
struct CliArgs {
    /// Database connection URL. Falls back to `HELPDESK_DATABASE_URL`, then
    /// `DATABASE_URL`, when omitted.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    let database_url = resolve_database_url(args.database_url)?;
    let applied =
        run_pending_migrations(&database_url).wrap_err("failed to apply migrations")?;
    if applied.is_empty() {
        println!("no pending migrations");
    }
    for version in applied {
        println!("applied={version}");
    }
    Ok(())
}

fn resolve_database_url(cli_value: Option<String>) -> Result<String> {
    cli_value
        .or_else(|| env::var("HELPDESK_DATABASE_URL").ok())
        .or_else(|| env::var("DATABASE_URL").ok())
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| eyre!("database URL is required: pass --database-url or set DATABASE_URL"))
}
