//! Folder repository implementation.

use sqlx::SqlitePool;

use treestore_core::error::{AppError, ErrorKind};
use treestore_core::result::AppResult;
use treestore_entity::folder::{FolderRecord, FolderUpdate, NewFolder};

/// Repository for folder rows and tree-shaped lookups.
#[derive(Debug, Clone)]
pub struct FolderRepository {
    pool: SqlitePool,
}

impl FolderRepository {
    /// Create a new folder repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find a folder row by ID.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<FolderRecord>> {
        sqlx::query_as::<_, FolderRecord>(
            "SELECT id, parent_id, name, path, created_time FROM folders WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find folder", e))
    }

    /// List the IDs of a folder's direct children.
    pub async fn find_child_ids(&self, parent_id: i64) -> AppResult<Vec<i64>> {
        sqlx::query_scalar::<_, i64>("SELECT id FROM folders WHERE parent_id = $1")
            .bind(parent_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list children", e))
    }

    /// Count a folder's direct children.
    pub async fn count_children(&self, parent_id: i64) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM folders WHERE parent_id = $1")
            .bind(parent_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count children", e)
            })?;
        Ok(count as u64)
    }

    /// Check whether any folder occupies the given path, optionally
    /// ignoring one row (the entity being updated).
    pub async fn path_exists(&self, path: &str, exclude_id: Option<i64>) -> AppResult<bool> {
        let query = match exclude_id {
            Some(id) => {
                sqlx::query_scalar::<_, bool>(
                    "SELECT EXISTS(SELECT 1 FROM folders WHERE path = $1 AND id != $2)",
                )
                .bind(path)
                .bind(id)
            }
            None => sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM folders WHERE path = $1)",
            )
            .bind(path),
        };

        query
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check path", e))
    }

    /// Insert a new folder row and return it with the generated ID.
    pub async fn create(&self, data: &NewFolder) -> AppResult<FolderRecord> {
        sqlx::query_as::<_, FolderRecord>(
            "INSERT INTO folders (parent_id, name, path, created_time) \
             VALUES ($1, $2, $3, $4) RETURNING id, parent_id, name, path, created_time",
        )
        .bind(data.parent_id)
        .bind(&data.name)
        .bind(&data.path)
        .bind(data.created_time)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::conflict(format!("Folder path '{}' already exists", data.path))
            }
            _ => AppError::with_source(ErrorKind::Database, "Inserting folder failed", e),
        })
    }

    /// Update a folder row's mutable fields.
    pub async fn update(&self, record: &FolderUpdate) -> AppResult<FolderRecord> {
        sqlx::query_as::<_, FolderRecord>(
            "UPDATE folders SET name = $2, path = $3, parent_id = $4 \
             WHERE id = $1 RETURNING id, parent_id, name, path, created_time",
        )
        .bind(record.id)
        .bind(&record.name)
        .bind(&record.path)
        .bind(record.parent_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::conflict(format!("Folder path '{}' already exists", record.path))
            }
            _ => AppError::with_source(ErrorKind::Database, "Updating folder failed", e),
        })?
        .ok_or_else(|| AppError::not_found(format!("Folder {} not found", record.id)))
    }

    /// Delete a folder row by ID. The schema cascades the delete to
    /// descendant folders and files.
    pub async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM folders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Could not delete folder", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
