//! CLI command implementations

pub mod get;
pub mod head;
pub mod ls;
pub mod put;
pub mod rm;
pub mod upload_image;
pub mod url;

use crate::OutputFormat;
use stash_core::config::UploadConfig;
use stash_storage::ObjectStore;
use std::sync::Arc;

/// Context passed to all commands
pub struct CommandContext {
    pub store: Arc<dyn ObjectStore>,
    pub bucket: String,
    pub region: String,
    pub upload: UploadConfig,
    pub output_format: OutputFormat,
    pub verbose: bool,
    pub quiet: bool,
}

impl CommandContext {
    /// Check if output should be JSON
    pub fn is_json(&self) -> bool {
        matches!(self.output_format, OutputFormat::Json)
    }

    /// Print info message if not quiet
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("{}", msg);
        }
    }

    /// Print verbose message if verbose mode
    pub fn debug(&self, msg: &str) {
        if self.verbose {
            eprintln!("[DEBUG] {}", msg);
        }
    }
}
