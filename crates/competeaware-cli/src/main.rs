mod classifier;
mod db;
mod scrape;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::classifier::ClassifierCommands;
use crate::db::DbCommands;

#[derive(Debug, Parser)]
#[command(name = "competeaware-cli")]
#[command(about = "CompeteAware command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Scrape every active competitor once
    Scrape {
        /// Fetch and extract only; print candidates without writing anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Classify stored updates that are still pending
    Categorize,
    /// Manage the update classifier model
    Classifier {
        #[command(subcommand)]
        command: ClassifierCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = competeaware_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Db { command }) => db::run(&config, command).await?,
        Some(Commands::Scrape { dry_run: true }) => scrape::run_dry(&config).await?,
        Some(Commands::Scrape { dry_run: false }) => scrape::run_scrape(&config).await?,
        Some(Commands::Categorize) => scrape::run_categorize(&config).await?,
        Some(Commands::Classifier { command }) => classifier::run(&config, command).await?,
        None => println!("competeaware-cli: pass --help to list commands"),
    }

    Ok(())
}

/// Connects to the configured database.
async fn connect(config: &competeaware_core::AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let pool_config = competeaware_db::PoolConfig::from_app_config(config);
    let pool = competeaware_db::connect_pool(&config.database_url, pool_config).await?;
    Ok(pool)
}

#[cfg(test)]
mod tests;
