//! Folder management CLI commands.

use chrono::Utc;
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use treestore_core::error::AppError;
use treestore_entity::folder::Folder;

/// Arguments for folder commands
#[derive(Debug, Args)]
pub struct FolderArgs {
    /// Folder subcommand
    #[command(subcommand)]
    pub command: FolderCommand,
}

/// Folder subcommands
#[derive(Debug, Subcommand)]
pub enum FolderCommand {
    /// Create a root folder
    CreateRoot {
        /// Folder name
        #[arg(short, long)]
        name: String,
        /// Full folder path
        #[arg(short, long)]
        path: String,
    },
    /// Create a folder under an existing parent, or under a new parent
    /// created in the same call
    Create {
        /// Folder name
        #[arg(short, long)]
        name: String,
        /// Full folder path
        #[arg(short, long)]
        path: String,
        /// ID of an existing parent folder
        #[arg(long, conflicts_with_all = ["parent_name", "parent_path"])]
        parent_id: Option<i64>,
        /// Name for a parent folder created alongside this one
        #[arg(long, requires = "parent_path")]
        parent_name: Option<String>,
        /// Path for a parent folder created alongside this one
        #[arg(long, requires = "parent_name")]
        parent_path: Option<String>,
    },
    /// Rename a folder
    Rename {
        /// Folder ID
        id: i64,
        /// New folder name
        new_name: String,
    },
    /// Delete a folder (descendants are removed with it)
    Delete {
        /// Folder ID
        id: i64,
    },
    /// Show a single folder
    Show {
        /// Folder ID
        id: i64,
    },
    /// List the direct child folders
    List {
        /// Folder ID
        id: i64,
    },
    /// Count child folders
    Count {
        /// Folder ID
        id: i64,
        /// Count every descendant instead of direct children only
        #[arg(short, long)]
        recursive: bool,
    },
    /// Report file sizes in a folder
    Size {
        /// Folder ID
        id: i64,
        /// Include every descendant folder
        #[arg(short, long)]
        recursive: bool,
    },
}

/// Folder display row
#[derive(Debug, Serialize, Tabled)]
struct FolderRow {
    /// Folder ID
    id: i64,
    /// Name
    name: String,
    /// Path
    path: String,
    /// Created at
    created: String,
}

impl FolderRow {
    fn from_entity(folder: &Folder) -> Self {
        Self {
            id: folder.id.unwrap_or_default(),
            name: folder.name.clone(),
            path: folder.path().unwrap_or_default().to_string(),
            created: folder
                .created_time
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
        }
    }
}

/// Build a parent folder that does not exist yet; the store persists it
/// as part of the create call, ancestor chain included.
pub(crate) fn transient_folder(name: &str, path: &str) -> Folder {
    let mut folder = Folder::new(name);
    folder.path = Some(path.to_string());
    folder.created_time = Some(Utc::now());
    folder
}

/// Execute folder commands
pub async fn execute(args: &FolderArgs, env: &str, format: OutputFormat) -> Result<(), AppError> {
    let fs = super::open_store(env).await?;

    match &args.command {
        FolderCommand::CreateRoot { name, path } => {
            let mut folder = Folder::new(name.clone());
            folder.path = Some(path.clone());
            folder.created_time = Some(Utc::now());

            match fs.create_root_folder(folder).await {
                Ok(folder) => output::print_success(&format!(
                    "Folder '{}' created (id: {})",
                    name,
                    folder.id.unwrap_or_default()
                )),
                Err(e) => output::print_error(&e.message),
            }
        }
        FolderCommand::Create {
            name,
            path,
            parent_id,
            parent_name,
            parent_path,
        } => {
            let parent = match parent_id {
                Some(parent_id) => match fs.load_folder(*parent_id).await? {
                    Some(parent) => parent,
                    None => {
                        output::print_error(&format!(
                            "Folder with ID {parent_id} does not exist in database"
                        ));
                        return Ok(());
                    }
                },
                None => match (parent_name, parent_path) {
                    (Some(parent_name), Some(parent_path)) => {
                        transient_folder(parent_name, parent_path)
                    }
                    _ => {
                        output::print_error(
                            "Parent not specified: pass --parent-id, or --parent-name with --parent-path",
                        );
                        return Ok(());
                    }
                },
            };

            let mut folder = Folder::new(name.clone());
            folder.path = Some(path.clone());
            folder.created_time = Some(Utc::now());

            match fs.create_folder(folder, parent).await {
                Ok(folder) => output::print_success(&format!(
                    "Folder '{}' created (id: {})",
                    name,
                    folder.id.unwrap_or_default()
                )),
                Err(e) => output::print_error(&e.message),
            }
        }
        FolderCommand::Rename { id, new_name } => {
            let Some(folder) = fs.load_folder(*id).await? else {
                output::print_error(&format!("Folder with ID {id} does not exist in database"));
                return Ok(());
            };

            match fs.rename_folder(folder, new_name).await {
                Ok(_) => output::print_success(&format!("Folder {id} renamed to '{new_name}'")),
                Err(e) => output::print_error(&e.message),
            }
        }
        FolderCommand::Delete { id } => {
            let Some(folder) = fs.load_folder(*id).await? else {
                output::print_error(&format!("Folder with ID {id} does not exist in database"));
                return Ok(());
            };

            match fs.delete_folder(&folder).await {
                Ok(()) => output::print_success(&format!(
                    "Folder {id} and its files and subfolders deleted"
                )),
                Err(e) => output::print_error(&e.message),
            }
        }
        FolderCommand::Show { id } => {
            let Some(folder) = fs.load_folder(*id).await? else {
                output::print_error(&format!("Folder with ID {id} does not exist in database"));
                return Ok(());
            };
            output::print_list(&[FolderRow::from_entity(&folder)], format);
        }
        FolderCommand::List { id } => {
            let Some(folder) = fs.load_folder(*id).await? else {
                output::print_error(&format!("Folder with ID {id} does not exist in database"));
                return Ok(());
            };

            let rows: Vec<FolderRow> = fs
                .folders(&folder)
                .await?
                .iter()
                .map(FolderRow::from_entity)
                .collect();
            output::print_list(&rows, format);
        }
        FolderCommand::Count { id, recursive } => {
            let Some(folder) = fs.load_folder(*id).await? else {
                output::print_error(&format!("Folder with ID {id} does not exist in database"));
                return Ok(());
            };

            if *recursive {
                let count = fs.all_sub_folder_count(&folder).await?;
                println!("{count} folders (including all the subfolders)");
            } else {
                let count = fs.folder_count(&folder).await?;
                println!("{count} folders");
            }
        }
        FolderCommand::Size { id, recursive } => {
            let Some(folder) = fs.load_folder(*id).await? else {
                output::print_error(&format!("Folder with ID {id} does not exist in database"));
                return Ok(());
            };

            if *recursive {
                let size = fs.directory_size(&folder).await?;
                println!("Directory size (including subdirectories): {size}");
            } else {
                let size = fs.total_file_size_in_folder(&folder).await?;
                println!("Size of the current directory excluding subdirectories: {size}");
            }
        }
    }

    Ok(())
}
