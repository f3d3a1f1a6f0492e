//! # treestore-database
//!
//! SQLite connection management and concrete repository implementations
//! for the treestore hierarchy tables.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
