//! Stash Storage
//!
//! The object store facade: a single [`ObjectStore`] trait with an S3 backend
//! and a local filesystem backend.

pub mod engine;
pub mod s3;

pub use engine::{LocalStore, ObjectStore};
pub use s3::S3Store;
