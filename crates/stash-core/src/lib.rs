//! Stash Core Library
//!
//! Core types, validation and utilities shared by the Stash crates.

pub mod config;
pub mod error;
pub mod types;
pub mod utils;

pub use config::StashConfig;
pub use error::{ConstraintViolation, Error, Result};

/// Stash version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default S3 region
pub const DEFAULT_REGION: &str = "us-east-1";

/// Host suffix used by public S3 object URLs
pub const S3_URL_MARKER: &str = "amazonaws.com/";

/// Maximum number of keys per DeleteObjects request
pub const MAX_DELETE_BATCH: usize = 1000;

/// Form field carrying JSON-encoded auxiliary request data
pub const EXTRA_ARGS_FIELD: &str = "extraArgs";
