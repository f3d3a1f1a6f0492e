//! Database migration CLI command.

use clap::Args;

use crate::output;
use treestore_core::error::AppError;
use treestore_database::{DatabasePool, migration};

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {}

/// Run all pending migrations against the configured database.
pub async fn execute(_args: &MigrateArgs, env: &str) -> Result<(), AppError> {
    let config = super::load_config(env)?;
    let pool = DatabasePool::connect(&config.database).await?;

    migration::run_migrations(pool.pool()).await?;
    output::print_success("Migrations applied");
    pool.close().await;
    Ok(())
}
