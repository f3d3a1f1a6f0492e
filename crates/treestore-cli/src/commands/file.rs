//! File management CLI commands.

use chrono::Utc;
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use super::folder;
use crate::output::{self, OutputFormat};
use treestore_core::error::AppError;
use treestore_entity::file::File;

/// Arguments for file commands
#[derive(Debug, Args)]
pub struct FileArgs {
    /// File subcommand
    #[command(subcommand)]
    pub command: FileCommand,
}

/// File subcommands
#[derive(Debug, Subcommand)]
pub enum FileCommand {
    /// Create a file inside an existing folder, or inside a new folder
    /// created in the same call
    Create {
        /// ID of an existing folder to place the file in
        #[arg(long, conflicts_with_all = ["folder_name", "folder_path"])]
        folder_id: Option<i64>,
        /// Name for a folder created alongside the file
        #[arg(long, requires = "folder_path")]
        folder_name: Option<String>,
        /// Path for a folder created alongside the file
        #[arg(long, requires = "folder_name")]
        folder_path: Option<String>,
        /// File name
        #[arg(short, long)]
        name: String,
        /// File size in bytes
        #[arg(short, long)]
        size: i64,
    },
    /// Rename a file
    Rename {
        /// File ID
        id: i64,
        /// New file name
        new_name: String,
    },
    /// Delete a file
    Delete {
        /// File ID
        id: i64,
    },
    /// Show a single file
    Show {
        /// File ID
        id: i64,
    },
    /// List the files in a folder
    List {
        /// Folder ID
        folder_id: i64,
    },
    /// Count files in a folder
    Count {
        /// Folder ID
        folder_id: i64,
    },
}

/// File display row
#[derive(Debug, Serialize, Tabled)]
struct FileRow {
    /// File ID
    id: i64,
    /// Name
    name: String,
    /// Size in bytes
    size: i64,
    /// Path
    path: String,
    /// Created at
    created: String,
    /// Modified at
    modified: String,
}

impl FileRow {
    fn from_entity(file: &File) -> Self {
        Self {
            id: file.id.unwrap_or_default(),
            name: file.name.clone(),
            size: file.size.unwrap_or_default(),
            path: file.path().unwrap_or_default(),
            created: file
                .created_time
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
            modified: file
                .modified_time
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
        }
    }
}

/// Execute file commands
pub async fn execute(args: &FileArgs, env: &str, format: OutputFormat) -> Result<(), AppError> {
    let fs = super::open_store(env).await?;

    match &args.command {
        FileCommand::Create {
            folder_id,
            folder_name,
            folder_path,
            name,
            size,
        } => {
            let parent = match folder_id {
                Some(folder_id) => match fs.load_folder(*folder_id).await? {
                    Some(parent) => parent,
                    None => {
                        output::print_error(&format!(
                            "Folder with ID {folder_id} does not exist in database"
                        ));
                        return Ok(());
                    }
                },
                None => match (folder_name, folder_path) {
                    (Some(folder_name), Some(folder_path)) => {
                        folder::transient_folder(folder_name, folder_path)
                    }
                    _ => {
                        output::print_error(
                            "Folder not specified: pass --folder-id, or --folder-name with --folder-path",
                        );
                        return Ok(());
                    }
                },
            };

            let mut file = File::new(name.clone(), *size);
            file.created_time = Some(Utc::now());

            match fs.create_file(file, parent).await {
                Ok(file) => output::print_success(&format!(
                    "File '{}' created (id: {})",
                    name,
                    file.id.unwrap_or_default()
                )),
                Err(e) => output::print_error(&e.message),
            }
        }
        FileCommand::Rename { id, new_name } => {
            let Some(file) = fs.load_file(*id).await? else {
                output::print_error(&format!("File with ID {id} does not exist in database"));
                return Ok(());
            };

            match fs.rename_file(file, new_name).await {
                Ok(_) => output::print_success(&format!("File {id} renamed to '{new_name}'")),
                Err(e) => output::print_error(&e.message),
            }
        }
        FileCommand::Delete { id } => {
            let Some(file) = fs.load_file(*id).await? else {
                output::print_error(&format!("File with ID {id} does not exist in database"));
                return Ok(());
            };

            match fs.delete_file(&file).await {
                Ok(()) => output::print_success(&format!("File {id} deleted")),
                Err(e) => output::print_error(&e.message),
            }
        }
        FileCommand::Show { id } => {
            let Some(file) = fs.load_file(*id).await? else {
                output::print_error(&format!("File with ID {id} does not exist in database"));
                return Ok(());
            };
            output::print_list(&[FileRow::from_entity(&file)], format);
        }
        FileCommand::List { folder_id } => {
            let Some(folder) = fs.load_folder(*folder_id).await? else {
                output::print_error(&format!(
                    "Folder with ID {folder_id} does not exist in database"
                ));
                return Ok(());
            };

            let rows: Vec<FileRow> = fs
                .files(&folder)
                .await?
                .iter()
                .map(FileRow::from_entity)
                .collect();
            output::print_list(&rows, format);
        }
        FileCommand::Count { folder_id } => {
            let Some(folder) = fs.load_folder(*folder_id).await? else {
                output::print_error(&format!(
                    "Folder with ID {folder_id} does not exist in database"
                ));
                return Ok(());
            };

            let count = fs.file_count(&folder).await?;
            println!("{count} files");
        }
    }

    Ok(())
}
