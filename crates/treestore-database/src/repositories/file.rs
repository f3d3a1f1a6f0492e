//! File repository implementation.

use sqlx::SqlitePool;

use treestore_core::error::{AppError, ErrorKind};
use treestore_core::result::AppResult;
use treestore_entity::file::{FileRecord, FileUpdate, NewFile};

/// Repository for file rows and per-folder aggregates.
#[derive(Debug, Clone)]
pub struct FileRepository {
    pool: SqlitePool,
}

impl FileRepository {
    /// Create a new file repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find a file row by ID.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<FileRecord>> {
        sqlx::query_as::<_, FileRecord>(
            "SELECT id, folder_id, name, size, path, created_time, modified_time \
             FROM files WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))
    }

    /// List the IDs of the files directly inside a folder.
    pub async fn find_ids_by_folder(&self, folder_id: i64) -> AppResult<Vec<i64>> {
        sqlx::query_scalar::<_, i64>("SELECT id FROM files WHERE folder_id = $1")
            .bind(folder_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list files", e))
    }

    /// Count the files directly inside a folder.
    pub async fn count_in_folder(&self, folder_id: i64) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM files WHERE folder_id = $1")
            .bind(folder_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count files", e))?;
        Ok(count as u64)
    }

    /// Sum the sizes of the files directly inside a folder.
    pub async fn total_size_in_folder(&self, folder_id: i64) -> AppResult<u64> {
        let total: i64 =
            sqlx::query_scalar("SELECT COALESCE(SUM(size), 0) FROM files WHERE folder_id = $1")
                .bind(folder_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to sum file sizes", e)
                })?;
        Ok(total as u64)
    }

    /// Check whether any file occupies the given path, optionally ignoring
    /// one row (the entity being updated).
    pub async fn path_exists(&self, path: &str, exclude_id: Option<i64>) -> AppResult<bool> {
        let query = match exclude_id {
            Some(id) => {
                sqlx::query_scalar::<_, bool>(
                    "SELECT EXISTS(SELECT 1 FROM files WHERE path = $1 AND id != $2)",
                )
                .bind(path)
                .bind(id)
            }
            None => {
                sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM files WHERE path = $1)")
                    .bind(path)
            }
        };

        query
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check path", e))
    }

    /// Insert a new file row and return it with the generated ID.
    pub async fn create(&self, data: &NewFile) -> AppResult<FileRecord> {
        sqlx::query_as::<_, FileRecord>(
            "INSERT INTO files (folder_id, name, size, path, created_time) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, folder_id, name, size, path, created_time, modified_time",
        )
        .bind(data.folder_id)
        .bind(&data.name)
        .bind(data.size)
        .bind(&data.path)
        .bind(data.created_time)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::conflict(format!("File path '{}' already exists", data.path))
            }
            _ => AppError::with_source(ErrorKind::Database, "Inserting file failed", e),
        })
    }

    /// Update a file row's mutable fields.
    pub async fn update(&self, record: &FileUpdate) -> AppResult<FileRecord> {
        sqlx::query_as::<_, FileRecord>(
            "UPDATE files SET folder_id = $2, name = $3, size = $4, path = $5, \
             modified_time = $6 WHERE id = $1 \
             RETURNING id, folder_id, name, size, path, created_time, modified_time",
        )
        .bind(record.id)
        .bind(record.folder_id)
        .bind(&record.name)
        .bind(record.size)
        .bind(&record.path)
        .bind(record.modified_time)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::conflict(format!("File path '{}' already exists", record.path))
            }
            _ => AppError::with_source(ErrorKind::Database, "Updating file failed", e),
        })?
        .ok_or_else(|| AppError::not_found(format!("File {} not found", record.id)))
    }

    /// Delete a file row by ID.
    pub async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Could not delete file", e))?;
        Ok(result.rows_affected() > 0)
    }
}
