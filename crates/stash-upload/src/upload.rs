//! Upload orchestration
//!
//! Each upload takes ownership of its staged file through a [`TempFileGuard`]
//! before any work starts, so the file is removed whether the upload succeeds,
//! is rejected by a constraint, fails in the store, or is dropped mid-flight.

use bytes::Bytes;
use futures::future::try_join_all;
use stash_core::types::{
    check_file_size, generate_object_key, ImageConstraints, ObjectAcl, PutObject,
};
use stash_core::utils::guess_content_type;
use stash_core::Result;
use stash_storage::ObjectStore;
use std::future::Future;
use tokio::fs;
use tracing::{debug, info};

use crate::dimensions::read_dimensions;
use crate::staging::{StagedFile, TempFileGuard};

/// Where and how image uploads are stored
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bucket: String,
    pub user_id: String,
    /// Key prefix for the uploaded objects
    pub directory: String,
    pub constraints: ImageConstraints,
    pub acl: ObjectAcl,
}

impl ImageUpload {
    pub fn new(
        bucket: impl Into<String>,
        user_id: impl Into<String>,
        directory: impl Into<String>,
    ) -> Self {
        Self {
            bucket: bucket.into(),
            user_id: user_id.into(),
            directory: directory.into(),
            constraints: ImageConstraints::default(),
            acl: ObjectAcl::PublicRead,
        }
    }

    pub fn with_constraints(mut self, constraints: ImageConstraints) -> Self {
        self.constraints = constraints;
        self
    }

    pub fn with_acl(mut self, acl: ObjectAcl) -> Self {
        self.acl = acl;
        self
    }
}

/// Where and how non-image uploads are stored
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub bucket: String,
    pub user_id: String,
    pub directory: String,
    pub max_file_size_kb: Option<u64>,
    pub acl: ObjectAcl,
}

impl FileUpload {
    pub fn new(
        bucket: impl Into<String>,
        user_id: impl Into<String>,
        directory: impl Into<String>,
    ) -> Self {
        Self {
            bucket: bucket.into(),
            user_id: user_id.into(),
            directory: directory.into(),
            max_file_size_kb: None,
            acl: ObjectAcl::PublicRead,
        }
    }

    pub fn with_max_file_size_kb(mut self, kb: u64) -> Self {
        self.max_file_size_kb = Some(kb);
        self
    }

    pub fn with_acl(mut self, acl: ObjectAcl) -> Self {
        self.acl = acl;
        self
    }
}

/// Upload a staged image after checking it against `upload.constraints`.
///
/// Resolves to the generated object key. The staged file is removed in every
/// case.
pub fn upload_image<'a, S>(
    store: &'a S,
    upload: &'a ImageUpload,
    file: &'a StagedFile,
) -> impl Future<Output = Result<String>> + Send + 'a
where
    S: ObjectStore + ?Sized + 'a,
{
    let guard = TempFileGuard::for_file(file);
    run_guarded(guard, store_image(store, upload, file))
}

/// Upload several staged images concurrently.
///
/// The first failure fails the whole batch; uploads still in flight are
/// dropped and their staged files removed.
pub async fn upload_images<S>(
    store: &S,
    upload: &ImageUpload,
    files: &[StagedFile],
) -> Result<Vec<String>>
where
    S: ObjectStore + ?Sized,
{
    let uploads: Vec<_> = files
        .iter()
        .map(|file| upload_image(store, upload, file))
        .collect();

    try_join_all(uploads).await
}

/// Upload a staged file of any type, checking only its size.
pub fn upload_file<'a, S>(
    store: &'a S,
    upload: &'a FileUpload,
    file: &'a StagedFile,
) -> impl Future<Output = Result<String>> + Send + 'a
where
    S: ObjectStore + ?Sized + 'a,
{
    let guard = TempFileGuard::for_file(file);
    run_guarded(guard, store_file(store, upload, file))
}

/// In-memory contents to put under a caller-chosen key
#[derive(Debug, Clone, Default)]
pub struct UploadContents {
    pub bucket: String,
    pub key: String,
    pub acl: Option<ObjectAcl>,
    /// Takes precedence over `text_contents` when both are set
    pub binary_contents: Option<Bytes>,
    pub text_contents: Option<String>,
    pub content_type: Option<String>,
}

/// Upload in-memory contents. Neither contents set stores an empty object.
pub async fn upload_contents<S>(store: &S, contents: UploadContents) -> Result<String>
where
    S: ObjectStore + ?Sized,
{
    let body = match (contents.binary_contents, contents.text_contents) {
        (Some(binary), _) => binary,
        (None, Some(text)) => Bytes::from(text),
        (None, None) => Bytes::new(),
    };

    let mut put = PutObject::new(contents.bucket, contents.key, body);
    put.acl = contents.acl;
    put.content_type = contents.content_type;

    store.put_object(put).await
}

async fn run_guarded<F>(guard: TempFileGuard, work: F) -> Result<String>
where
    F: Future<Output = Result<String>>,
{
    let result = work.await;
    guard.release().await;
    result
}

async fn store_image<S>(store: &S, upload: &ImageUpload, file: &StagedFile) -> Result<String>
where
    S: ObjectStore + ?Sized,
{
    let body = fs::read(file.path()).await?;
    let dimensions = read_dimensions(&body)?;

    debug!(
        "Validating {} ({}x{}, {} bytes)",
        file.original_name,
        dimensions.width,
        dimensions.height,
        body.len()
    );
    upload.constraints.validate(dimensions, body.len() as u64)?;

    let key = generate_object_key(&upload.directory, &upload.user_id, &file.original_name);
    let put = PutObject::new(&upload.bucket, key, body)
        .with_acl(upload.acl)
        .with_content_type(guess_content_type(&file.original_name));

    let key = store.put_object(put).await?;
    info!("Uploaded image {} to {}/{}", file.original_name, upload.bucket, key);

    Ok(key)
}

async fn store_file<S>(store: &S, upload: &FileUpload, file: &StagedFile) -> Result<String>
where
    S: ObjectStore + ?Sized,
{
    check_file_size(file.size, upload.max_file_size_kb)?;

    let body = fs::read(file.path()).await?;
    let key = generate_object_key(&upload.directory, &upload.user_id, &file.original_name);
    let put = PutObject::new(&upload.bucket, key, body)
        .with_acl(upload.acl)
        .with_content_type(guess_content_type(&file.original_name));

    let key = store.put_object(put).await?;
    info!("Uploaded file {} to {}/{}", file.original_name, upload.bucket, key);

    Ok(key)
}
