//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::PATH_SEPARATOR;
use crate::folder::Folder;

/// A file in the virtual hierarchy.
///
/// Every persisted file belongs to exactly one folder. Like [`Folder`], a
/// file is transient until the store assigns its id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct File {
    /// Identifier assigned by the store on first persist.
    pub id: Option<i64>,
    /// File name (empty = not yet specified).
    pub name: String,
    /// File size in bytes; zero is valid, absence is a validation error.
    pub size: Option<i64>,
    /// When the file was created; required before persistence.
    pub created_time: Option<DateTime<Utc>>,
    /// When the file was last updated; set only by update operations.
    pub modified_time: Option<DateTime<Utc>>,
    /// Explicitly stored path; see [`File::path`] for precedence.
    pub path: Option<String>,
    /// The folder this file belongs to. Required for persistence.
    pub parent: Option<Box<Folder>>,
}

impl File {
    /// Create a transient file with the given name and size.
    pub fn new(name: impl Into<String>, size: i64) -> Self {
        Self {
            name: name.into(),
            size: Some(size),
            ..Self::default()
        }
    }

    /// Check if this file has been persisted.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// The file's hierarchical path.
    ///
    /// Computed as `parent.path / name` whenever both the name and the
    /// parent path are available; the computed value always wins, so a
    /// rename is reflected immediately. The explicitly stored path is only
    /// a fallback for files whose name or parent is missing.
    pub fn path(&self) -> Option<String> {
        let parent_path = self.parent.as_ref().and_then(|p| p.path());
        match parent_path {
            Some(parent_path) if !self.name.is_empty() => {
                Some(format!("{parent_path}{PATH_SEPARATOR}{}", self.name))
            }
            _ => self.path.clone(),
        }
    }
}

/// A `files` table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct FileRecord {
    /// Unique file identifier.
    pub id: i64,
    /// The folder containing this file.
    pub folder_id: i64,
    /// File name.
    pub name: String,
    /// File size in bytes.
    pub size: i64,
    /// Full hierarchical path.
    pub path: String,
    /// When the file was created.
    pub created_time: DateTime<Utc>,
    /// When the file was last updated (null until first update).
    pub modified_time: Option<DateTime<Utc>>,
}

/// Data required to insert a new file row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFile {
    /// The folder to place the file in.
    pub folder_id: i64,
    /// File name.
    pub name: String,
    /// File size in bytes.
    pub size: i64,
    /// Full hierarchical path.
    pub path: String,
    /// Creation timestamp.
    pub created_time: DateTime<Utc>,
}

/// Mutable fields of an existing file row. The creation timestamp is
/// immutable and therefore absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileUpdate {
    /// The row to update.
    pub id: i64,
    /// The folder containing the file.
    pub folder_id: i64,
    /// File name.
    pub name: String,
    /// File size in bytes.
    pub size: i64,
    /// Full hierarchical path.
    pub path: String,
    /// Modification timestamp stamped by the update operation.
    pub modified_time: Option<DateTime<Utc>>,
}
