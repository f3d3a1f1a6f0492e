//! # treestore-entity
//!
//! Domain entity models for treestore. [`folder::Folder`] and
//! [`file::File`] are in-memory value objects carrying the transient or
//! persisted state of one node in the hierarchy; the `*Record` and `New*`
//! structs map one-to-one onto database rows and derive `sqlx::FromRow`
//! where they are read back.

pub mod file;
pub mod folder;

/// Separator used when composing hierarchical paths.
pub const PATH_SEPARATOR: char = '/';
