//! Stash Upload
//!
//! Moves user files from a local staging directory into an object store:
//! staging, dimension and size checks, key generation, and removal of the
//! staged file on every exit path.

pub mod args;
pub mod dimensions;
pub mod staging;
pub mod upload;

pub use args::parse_extra_args;
pub use dimensions::read_dimensions;
pub use staging::{collapse_files, DiskStaging, FilesField, StagedFile, TempFileGuard};
pub use upload::{
    upload_contents, upload_file, upload_image, upload_images, FileUpload, ImageUpload,
    UploadContents,
};
