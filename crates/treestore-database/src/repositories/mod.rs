//! Repository implementations for the hierarchy tables.

pub mod file;
pub mod folder;

pub use file::FileRepository;
pub use folder::FolderRepository;
