//! CLI command definitions and dispatch.

pub mod file;
pub mod folder;
pub mod migrate;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use treestore_core::config::AppConfig;
use treestore_core::error::AppError;
use treestore_database::DatabasePool;
use treestore_database::repositories::{FileRepository, FolderRepository};
use treestore_service::FileSystem;

/// Treestore — virtual folder and file hierarchy tracker
#[derive(Debug, Parser)]
#[command(name = "treestore", version, about, long_about = None)]
pub struct Cli {
    /// Configuration environment (reads config/default.toml plus
    /// config/<env>.toml)
    #[arg(short, long, default_value = "local")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Folder management
    Folder(folder::FolderArgs),
    /// File management
    File(file::FileArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, &self.env).await,
            Commands::Folder(args) => folder::execute(args, &self.env, self.format).await,
            Commands::File(args) => file::execute(args, &self.env, self.format).await,
        }
    }
}

/// Helper: load configuration for the given environment
pub fn load_config(env: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(env)
}

/// Helper: open the database and build the hierarchy store
pub async fn open_store(env: &str) -> Result<FileSystem, AppError> {
    let config = load_config(env)?;
    let pool = DatabasePool::connect(&config.database).await?.into_pool();
    Ok(FileSystem::new(
        Arc::new(FolderRepository::new(pool.clone())),
        Arc::new(FileRepository::new(pool)),
    ))
}
