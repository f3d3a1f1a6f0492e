//! Folder domain entities.

pub mod model;

pub use model::{Folder, FolderRecord, FolderUpdate, NewFolder};
