//! # treestore-service
//!
//! The hierarchy store. [`fs::FileSystem`] owns entity validation,
//! path-uniqueness enforcement, cascading creation of unpersisted ancestor
//! folders, hydration of ancestor chains, and the recursive aggregate
//! queries over the folder tree.

pub mod fs;

pub use fs::FileSystem;
