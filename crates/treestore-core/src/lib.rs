//! # treestore-core
//!
//! Shared error handling, result alias, and configuration schemas for
//! treestore. Every other crate maps its failures into [`error::AppError`]
//! and returns [`result::AppResult`].

pub mod config;
pub mod error;
pub mod result;
