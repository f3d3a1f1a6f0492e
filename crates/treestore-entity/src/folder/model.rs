//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A folder in the virtual hierarchy.
///
/// A folder starts out transient (`id` is `None`) and becomes persisted the
/// first time the hierarchy store inserts it; the id is never reassigned.
/// The parent back-pointer is an owned boxed value scoped to the entity,
/// not a shared handle into some other tree — a root folder has no parent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    /// Identifier assigned by the store on first persist.
    pub id: Option<i64>,
    /// Folder name (empty = not yet specified).
    pub name: String,
    /// Full hierarchical path, stored verbatim (e.g. `/documents/reports`).
    pub path: Option<String>,
    /// When the folder was created; required before persistence.
    pub created_time: Option<DateTime<Utc>>,
    /// Parent folder (None for root folders).
    pub parent: Option<Box<Folder>>,
}

impl Folder {
    /// Create a transient folder with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Check if this folder has been persisted.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Check if this is a root folder (no parent).
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// The stored path, if one has been set.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }
}

/// A `folders` table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct FolderRecord {
    /// Unique folder identifier.
    pub id: i64,
    /// Parent folder ID (null for root folders).
    pub parent_id: Option<i64>,
    /// Folder name.
    pub name: String,
    /// Full hierarchical path.
    pub path: String,
    /// When the folder was created.
    pub created_time: DateTime<Utc>,
}

/// Data required to insert a new folder row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFolder {
    /// Parent folder ID (None for root).
    pub parent_id: Option<i64>,
    /// Folder name.
    pub name: String,
    /// Full hierarchical path.
    pub path: String,
    /// Creation timestamp.
    pub created_time: DateTime<Utc>,
}

/// Mutable fields of an existing folder row. The creation timestamp is
/// immutable and therefore absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderUpdate {
    /// The row to update.
    pub id: i64,
    /// Parent folder ID (None for root).
    pub parent_id: Option<i64>,
    /// Folder name.
    pub name: String,
    /// Full hierarchical path.
    pub path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_folder_is_transient_root() {
        let folder = Folder::new("documents");
        assert!(!folder.is_persisted());
        assert!(folder.is_root());
        assert_eq!(folder.path(), None);
    }

    #[test]
    fn test_parent_makes_non_root() {
        let parent = Folder::new("root");
        let mut child = Folder::new("child");
        child.parent = Some(Box::new(parent));
        assert!(!child.is_root());
    }
}
