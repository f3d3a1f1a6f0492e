//! The hierarchy store and its validation rules.

pub mod service;
pub mod validate;

pub use service::FileSystem;
