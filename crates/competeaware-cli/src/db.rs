//! `db` subcommands: connectivity check, migrations, and seeding.

use clap::Subcommand;
use competeaware_core::AppConfig;

#[derive(Debug, Subcommand)]
pub enum DbCommands {
    /// Check that the database answers
    Ping,
    /// Apply pending migrations
    Migrate,
    /// Upsert competitors from the competitors YAML file
    Seed,
}

pub(crate) async fn run(config: &AppConfig, command: DbCommands) -> anyhow::Result<()> {
    let pool = crate::connect(config).await?;

    match command {
        DbCommands::Ping => {
            competeaware_db::health_check(&pool).await?;
            println!("database ok");
        }
        DbCommands::Migrate => {
            competeaware_db::run_migrations(&pool).await?;
            println!("migrations applied");
        }
        DbCommands::Seed => {
            let file = competeaware_core::load_competitors(&config.competitors_path)?;
            let count = competeaware_db::seed_competitors(&pool, &file.competitors).await?;
            tracing::info!(
                count,
                path = %config.competitors_path.display(),
                "seeded competitors"
            );
            println!("seeded {count} competitors");
        }
    }

    Ok(())
}
