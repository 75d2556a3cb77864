use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod tracing_setup;

use config::PlayerctlConfig;
use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(name = "playerctl", version, about = "Player roster REST service")]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file (default: ~/.playerctl/config.toml)
    #[arg(long, global = true, env = "PLAYERCTL_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::ServeArgs),
    /// Apply database migrations
    Migrate(commands::MigrateArgs),
    /// Inspect configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    tracing_setup::init(&TracingConfig { debug: cli.debug }).ok();

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Serve(args) => {
            commands::run_serve(args, PlayerctlConfig::load(config_path)?).await?
        }
        Commands::Migrate(args) => {
            commands::run_migrate(args, PlayerctlConfig::load(config_path)?).await?
        }
        Commands::Config(args) => config::run_config(args, config_path)?,
    }

    Ok(())
}
