//! Apply the players schema without starting the server

use anyhow::{Context, Result};
use clap::Parser;

use playerctl_server::db::{create_pool, run_migrations};

use crate::config::PlayerctlConfig;

#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// Database URL (overrides config/environment)
    #[arg(long)]
    pub database_url: Option<String>,
}

pub async fn run_migrate(args: MigrateArgs, config: PlayerctlConfig) -> Result<()> {
    let database_url = args
        .database_url
        .or(config.database.url)
        .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or ~/.playerctl/config.toml")?;

    let pool = create_pool(&database_url)
        .await
        .context("Failed to create database pool")?;
    run_migrations(&pool).await.context("Failed to run migrations")?;

    println!("Migrations applied");
    Ok(())
}
