//! The hierarchy store.
//!
//! All store operations issue sequential queries against the shared pool;
//! nothing here locks or retries. Validation is fully evaluated before any
//! write, and multi-step cascades are best-effort: a cascaded ancestor that
//! was persisted before a later step failed stays persisted.

use std::sync::Arc;

use chrono::Utc;
use futures::future::BoxFuture;
use tracing::info;

use treestore_core::error::AppError;
use treestore_core::result::AppResult;
use treestore_database::repositories::{FileRepository, FolderRepository};
use treestore_entity::PATH_SEPARATOR;
use treestore_entity::file::{File, FileUpdate, NewFile};
use treestore_entity::folder::{Folder, FolderUpdate, NewFolder};

use super::validate;

/// Persistence and hierarchy management for folders and files.
///
/// Entities move from transient (no id) to persisted (id assigned exactly
/// once) through the creation operations; loads hydrate the full ancestor
/// chain; aggregates walk the subtree depth-first.
#[derive(Debug, Clone)]
pub struct FileSystem {
    /// Folder repository.
    folder_repo: Arc<FolderRepository>,
    /// File repository.
    file_repo: Arc<FileRepository>,
}

impl FileSystem {
    /// Create a new hierarchy store over the given repositories.
    pub fn new(folder_repo: Arc<FolderRepository>, file_repo: Arc<FileRepository>) -> Self {
        Self {
            folder_repo,
            file_repo,
        }
    }

    // ---- Folder creation ----

    /// Validate and persist a folder with no parent.
    ///
    /// Fails with a single validation error listing every violated rule;
    /// on success the generated id is assigned to the returned folder.
    pub async fn create_root_folder(&self, mut folder: Folder) -> AppResult<Folder> {
        let path_taken = match folder.path() {
            Some(path) => self.folder_repo.path_exists(path, None).await?,
            None => false,
        };
        validate::report(
            "creating root folder",
            &validate::root_folder_rules(&folder, path_taken),
        )?;

        let record = self.folder_repo.create(&folder_row(&folder, None)?).await?;
        folder.id = Some(record.id);

        info!(folder_id = record.id, path = %record.path, "Root folder created");
        Ok(folder)
    }

    /// Validate and persist a folder under the given parent.
    ///
    /// An unpersisted parent is persisted first, recursively, so a whole
    /// ancestor chain can be materialized by one call. The child row
    /// references the parent's id.
    pub async fn create_folder(&self, mut folder: Folder, parent: Folder) -> AppResult<Folder> {
        let path_taken = match folder.path() {
            Some(path) => self.folder_repo.path_exists(path, None).await?,
            None => false,
        };
        validate::report(
            "creating folder",
            &validate::child_folder_rules(&folder, &parent, path_taken),
        )?;

        folder.parent = Some(Box::new(parent));
        if let Some(parent) = folder.parent.as_deref_mut() {
            self.ensure_folder_persisted(parent).await?;
        }

        let parent_id = folder
            .parent
            .as_ref()
            .and_then(|p| p.id)
            .ok_or_else(|| AppError::internal("Parent folder has no id after persistence"))?;

        let record = self
            .folder_repo
            .create(&folder_row(&folder, Some(parent_id))?)
            .await?;
        folder.id = Some(record.id);

        info!(folder_id = record.id, parent_id, path = %record.path, "Folder created");
        Ok(folder)
    }

    // ---- File creation ----

    /// Validate and persist a file inside the given parent folder.
    ///
    /// The parent reference is set on the file; an unpersisted parent is
    /// persisted first with the same ancestor-chain cascade as
    /// [`FileSystem::create_folder`].
    pub async fn create_file(&self, mut file: File, parent: Folder) -> AppResult<File> {
        file.parent = Some(Box::new(parent));
        if let Some(parent) = file.parent.as_deref_mut() {
            self.ensure_folder_persisted(parent).await?;
        }

        let path_taken = match file.path() {
            Some(path) => self.file_repo.path_exists(&path, None).await?,
            None => false,
        };
        validate::report("creating file", &validate::file_rules(&file, path_taken))?;

        let folder_id = file
            .parent
            .as_ref()
            .and_then(|p| p.id)
            .ok_or_else(|| AppError::internal("Parent folder has no id after persistence"))?;

        let record = self.file_repo.create(&file_row(&file, folder_id)?).await?;
        file.id = Some(record.id);

        info!(file_id = record.id, folder_id, path = %record.path, "File created");
        Ok(file)
    }

    // ---- Update / rename ----

    /// Persist the mutable fields of an already-persisted file, stamping
    /// its modification time.
    pub async fn update_file(&self, mut file: File) -> AppResult<File> {
        let Some(id) = file.id else {
            return Err(AppError::precondition(
                "File needs to be persisted before it can be updated",
            ));
        };

        if let Some(path) = file.path() {
            if self.file_repo.path_exists(&path, Some(id)).await? {
                return Err(AppError::validation(
                    "Another file with the same path already exists",
                ));
            }
        }

        file.modified_time = Some(Utc::now());

        let folder_id = file.parent.as_ref().and_then(|p| p.id).ok_or_else(|| {
            AppError::precondition("File parent folder needs to be persisted before an update")
        })?;
        let path = file
            .path()
            .ok_or_else(|| AppError::validation("File path not specified"))?;
        let size = file
            .size
            .ok_or_else(|| AppError::validation("Filesize not specified"))?;

        let record = self
            .file_repo
            .update(&FileUpdate {
                id,
                folder_id,
                name: file.name.clone(),
                size,
                path,
                modified_time: file.modified_time,
            })
            .await?;

        info!(file_id = id, path = %record.path, "File updated");
        Ok(file)
    }

    /// Persist the mutable fields of an already-persisted folder.
    pub async fn update_folder(&self, folder: Folder) -> AppResult<Folder> {
        let Some(id) = folder.id else {
            return Err(AppError::precondition(
                "Folder needs to be persisted before it can be updated",
            ));
        };

        if let Some(path) = folder.path() {
            if self.folder_repo.path_exists(path, Some(id)).await? {
                return Err(AppError::validation(
                    "Another folder with the same path already exists",
                ));
            }
        }

        let path = folder
            .path
            .clone()
            .ok_or_else(|| AppError::validation("Path not specified"))?;

        let record = self
            .folder_repo
            .update(&FolderUpdate {
                id,
                parent_id: folder.parent.as_ref().and_then(|p| p.id),
                name: folder.name.clone(),
                path,
            })
            .await?;

        info!(folder_id = id, path = %record.path, "Folder updated");
        Ok(folder)
    }

    /// Rename a file. The path follows the name automatically, so this is
    /// update-with-a-name-change, not a distinct persistence path.
    pub async fn rename_file(&self, mut file: File, new_name: &str) -> AppResult<File> {
        file.name = new_name.to_string();
        self.update_file(file).await
    }

    /// Rename a folder, recomputing its stored path before delegating to
    /// [`FileSystem::update_folder`].
    pub async fn rename_folder(&self, mut folder: Folder, new_name: &str) -> AppResult<Folder> {
        folder.name = new_name.to_string();
        folder.path = match folder.parent.as_ref().and_then(|p| p.path()) {
            Some(parent_path) => Some(format!("{parent_path}{PATH_SEPARATOR}{new_name}")),
            None => folder.path.as_deref().map(|path| {
                match path.rfind(PATH_SEPARATOR) {
                    Some(idx) => format!("{}{PATH_SEPARATOR}{new_name}", &path[..idx]),
                    None => new_name.to_string(),
                }
            }),
        };
        self.update_folder(folder).await
    }

    // ---- Deletion ----

    /// Delete a file by id. A transient file (no id) is a no-op reported
    /// as success without contacting storage.
    pub async fn delete_file(&self, file: &File) -> AppResult<()> {
        if let Some(id) = file.id {
            self.file_repo.delete(id).await?;
            info!(file_id = id, "File deleted");
        }
        Ok(())
    }

    /// Delete a folder by id; the schema cascades to descendant folders
    /// and files. A transient folder is a no-op reported as success.
    pub async fn delete_folder(&self, folder: &Folder) -> AppResult<()> {
        if let Some(id) = folder.id {
            self.folder_repo.delete(id).await?;
            info!(folder_id = id, "Folder deleted");
        }
        Ok(())
    }

    // ---- Read / navigation ----

    /// Load a folder by id, hydrating its entire ancestor chain. Absence
    /// is `None`, never an error.
    pub async fn load_folder(&self, id: i64) -> AppResult<Option<Folder>> {
        let Some(record) = self.folder_repo.find_by_id(id).await? else {
            return Ok(None);
        };

        // Collect the ancestor records leaf-to-root, then fold them back
        // into a parent chain root-first.
        let mut next = record.parent_id;
        let mut chain = vec![record];
        while let Some(parent_id) = next {
            match self.folder_repo.find_by_id(parent_id).await? {
                Some(parent) => {
                    next = parent.parent_id;
                    chain.push(parent);
                }
                None => break,
            }
        }

        let mut hydrated: Option<Box<Folder>> = None;
        for record in chain.into_iter().rev() {
            hydrated = Some(Box::new(Folder {
                id: Some(record.id),
                name: record.name,
                path: Some(record.path),
                created_time: Some(record.created_time),
                parent: hydrated,
            }));
        }

        Ok(hydrated.map(|folder| *folder))
    }

    /// Load a file by id, hydrating its parent folder chain. Absence is
    /// `None`, never an error.
    pub async fn load_file(&self, id: i64) -> AppResult<Option<File>> {
        let Some(record) = self.file_repo.find_by_id(id).await? else {
            return Ok(None);
        };

        let parent = self.load_folder(record.folder_id).await?;

        Ok(Some(File {
            id: Some(record.id),
            name: record.name,
            size: Some(record.size),
            created_time: Some(record.created_time),
            modified_time: record.modified_time,
            path: Some(record.path),
            parent: parent.map(Box::new),
        }))
    }

    /// The direct child folders of a folder, each individually hydrated.
    /// Order is unspecified.
    pub async fn folders(&self, folder: &Folder) -> AppResult<Vec<Folder>> {
        let Some(id) = folder.id else {
            return Ok(Vec::new());
        };

        let mut children = Vec::new();
        for child_id in self.folder_repo.find_child_ids(id).await? {
            if let Some(child) = self.load_folder(child_id).await? {
                children.push(child);
            }
        }
        Ok(children)
    }

    /// The files directly inside a folder, each individually hydrated.
    /// Order is unspecified.
    pub async fn files(&self, folder: &Folder) -> AppResult<Vec<File>> {
        let Some(id) = folder.id else {
            return Ok(Vec::new());
        };

        let mut files = Vec::new();
        for file_id in self.file_repo.find_ids_by_folder(id).await? {
            if let Some(file) = self.load_file(file_id).await? {
                files.push(file);
            }
        }
        Ok(files)
    }

    // ---- Aggregates ----

    /// Count of direct child folders only.
    pub async fn folder_count(&self, folder: &Folder) -> AppResult<u64> {
        match folder.id {
            Some(id) => self.folder_repo.count_children(id).await,
            None => Ok(0),
        }
    }

    /// Count of all descendant folders at every depth.
    pub async fn all_sub_folder_count(&self, folder: &Folder) -> AppResult<u64> {
        let Some(id) = folder.id else {
            return Ok(0);
        };

        let mut total = 0u64;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let children = self.folder_repo.find_child_ids(current).await?;
            total += children.len() as u64;
            stack.extend(children);
        }
        Ok(total)
    }

    /// Count of files directly inside a folder.
    pub async fn file_count(&self, folder: &Folder) -> AppResult<u64> {
        match folder.id {
            Some(id) => self.file_repo.count_in_folder(id).await,
            None => Ok(0),
        }
    }

    /// Sum of the sizes of the files directly inside a folder.
    pub async fn total_file_size_in_folder(&self, folder: &Folder) -> AppResult<u64> {
        match folder.id {
            Some(id) => self.file_repo.total_size_in_folder(id).await,
            None => Ok(0),
        }
    }

    /// Total bytes across the whole subtree: the folder's own files plus
    /// the files of every descendant folder.
    pub async fn directory_size(&self, folder: &Folder) -> AppResult<u64> {
        let Some(id) = folder.id else {
            return Ok(0);
        };

        let mut total = self.file_repo.total_size_in_folder(id).await?;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            for child_id in self.folder_repo.find_child_ids(current).await? {
                total += self.file_repo.total_size_in_folder(child_id).await?;
                stack.push(child_id);
            }
        }
        Ok(total)
    }

    // ---- Internals ----

    /// Persist a folder and its unpersisted ancestors, root-first.
    ///
    /// Already-persisted folders short-circuit, so the recursion stops at
    /// the first ancestor that has an id (or at the root).
    fn ensure_folder_persisted<'a>(
        &'a self,
        folder: &'a mut Folder,
    ) -> BoxFuture<'a, AppResult<()>> {
        Box::pin(async move {
            if folder.id.is_some() {
                return Ok(());
            }

            if let Some(parent) = folder.parent.as_deref_mut() {
                self.ensure_folder_persisted(parent).await?;
            }

            let path_taken = match folder.path() {
                Some(path) => self.folder_repo.path_exists(path, None).await?,
                None => false,
            };

            let record = match folder.parent.as_deref() {
                Some(parent) => {
                    validate::report(
                        "creating folder",
                        &validate::child_folder_rules(folder, parent, path_taken),
                    )?;
                    let parent_id = parent.id.ok_or_else(|| {
                        AppError::internal("Parent folder has no id after persistence")
                    })?;
                    self.folder_repo
                        .create(&folder_row(folder, Some(parent_id))?)
                        .await?
                }
                None => {
                    validate::report(
                        "creating root folder",
                        &validate::root_folder_rules(folder, path_taken),
                    )?;
                    self.folder_repo.create(&folder_row(folder, None)?).await?
                }
            };

            folder.id = Some(record.id);
            info!(folder_id = record.id, path = %record.path, "Ancestor folder persisted");
            Ok(())
        })
    }
}

/// Build an insertable folder row. Field presence was established by
/// validation; absence here is an internal error, not a user-facing one.
fn folder_row(folder: &Folder, parent_id: Option<i64>) -> AppResult<NewFolder> {
    let path = folder
        .path
        .clone()
        .ok_or_else(|| AppError::internal("Folder path missing"))?;
    let created_time = folder
        .created_time
        .ok_or_else(|| AppError::internal("Folder created time missing"))?;

    Ok(NewFolder {
        parent_id,
        name: folder.name.clone(),
        path,
        created_time,
    })
}

/// Build an insertable file row. Same contract as [`folder_row`].
fn file_row(file: &File, folder_id: i64) -> AppResult<NewFile> {
    let path = file
        .path()
        .ok_or_else(|| AppError::internal("File path missing"))?;
    let size = file
        .size
        .ok_or_else(|| AppError::internal("File size missing"))?;
    let created_time = file
        .created_time
        .ok_or_else(|| AppError::internal("File created time missing"))?;

    Ok(NewFile {
        folder_id,
        name: file.name.clone(),
        size,
        path,
        created_time,
    })
}
