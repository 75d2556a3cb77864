//! HTTP server command for the player roster API

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use playerctl_server::db::{
    create_pool_with_options, run_migrations, MemoryPlayerStore, PgPlayerStore, PlayerStore,
};
use playerctl_server::{run_server, PlayerService, ServerConfig};

use crate::config::PlayerctlConfig;

/// Arguments for the serve command
#[derive(Parser, Debug, Default)]
pub struct ServeArgs {
    /// Address to bind to (default: 127.0.0.1:8080)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Database URL (overrides config/environment)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Maximum pooled database connections
    #[arg(long)]
    pub max_connections: Option<u32>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Keep players in memory instead of PostgreSQL (data is lost on exit)
    #[arg(long, conflicts_with = "database_url")]
    pub in_memory: bool,

    /// Don't apply migrations on startup
    #[arg(long)]
    pub skip_migrations: bool,
}

impl ServeArgs {
    /// Merge flags over the loaded configuration.
    pub fn server_config(&self, config: &PlayerctlConfig) -> ServerConfig {
        ServerConfig {
            bind_addr: self.bind.unwrap_or(config.server.bind),
            cors_permissive: self.cors_permissive || config.server.cors_permissive,
            request_timeout: Duration::from_secs(
                self.timeout.unwrap_or(config.server.request_timeout_secs),
            ),
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs, config: PlayerctlConfig) -> Result<()> {
    let server_config = args.server_config(&config);

    let store: Arc<dyn PlayerStore> = if args.in_memory {
        tracing::warn!("Using in-memory store; players are not persisted");
        Arc::new(MemoryPlayerStore::new())
    } else {
        let database_url = args
            .database_url
            .or(config.database.url)
            .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or ~/.playerctl/config.toml")?;
        let max_connections = args.max_connections.unwrap_or(config.database.max_connections);

        let pool = create_pool_with_options(&database_url, max_connections)
            .await
            .context("Failed to create database pool")?;

        if !args.skip_migrations {
            run_migrations(&pool)
                .await
                .context("Failed to run migrations")?;
        }

        Arc::new(PgPlayerStore::new(pool))
    };

    tracing::info!("Starting playerctl server on {}", server_config.bind_addr);

    // Run server (blocks until shutdown)
    run_server(PlayerService::new(store), server_config)
        .await
        .context("Server error")?;

    Ok(())
}
