//! Object store trait and the local filesystem backend

use async_trait::async_trait;
use bytes::Bytes;
use futures::future::try_join_all;
use stash_core::types::{key_from_url, ChunkRequest, ObjectData, PutObject};
use stash_core::utils::guess_content_type;
use stash_core::{Error, Result};
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tracing::{debug, info};

/// Object store facade
///
/// Every call is a single remote operation. Failures from the backend are
/// returned as-is and never retried here.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store an object, overwriting any existing object under the same key.
    /// Returns the key.
    async fn put_object(&self, request: PutObject) -> Result<String>;

    /// Fetch an object, or only the window described by `range`
    async fn get_object(
        &self,
        bucket: &str,
        key: &str,
        range: Option<ChunkRequest>,
    ) -> Result<ObjectData>;

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()>;

    /// Delete several objects; fails if any single key fails
    async fn delete_objects(&self, bucket: &str, keys: &[String]) -> Result<()>;

    /// Size of an object in bytes
    async fn head_object(&self, bucket: &str, key: &str) -> Result<u64>;

    /// Every key under `prefix`, across all result pages
    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<String>>;

    /// Delete the object a public URL points at
    async fn delete_object_by_url(&self, bucket: &str, url: &str) -> Result<()> {
        let key = key_from_url(url)?;
        self.delete_object(bucket, &key).await
    }

    /// Fetch bytes `start..=end` of an object
    async fn get_range_of_object(
        &self,
        bucket: &str,
        key: &str,
        start: i64,
        end: i64,
    ) -> Result<ObjectData> {
        let chunk = ChunkRequest::try_new(start, end)?;
        self.get_object(bucket, key, Some(chunk)).await
    }
}

/// Local filesystem object store
///
/// Objects live at `{data_dir}/{bucket}/{key}`. ACLs are accepted and ignored.
pub struct LocalStore {
    data_dir: PathBuf,
}

impl LocalStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }

    pub async fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir).await?;
        info!("Local store initialized at {:?}", self.data_dir);
        Ok(())
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn bucket_path(&self, bucket: &str) -> Result<PathBuf> {
        if bucket.is_empty() || bucket.contains(['/', '\\']) || bucket == "." || bucket == ".." {
            return Err(Error::InvalidArgument(format!("Invalid bucket name: {}", bucket)));
        }
        Ok(self.data_dir.join(bucket))
    }

    fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if key.is_empty() || escapes {
            return Err(Error::InvalidArgument(format!("Invalid object key: {}", key)));
        }
        Ok(self.bucket_path(bucket)?.join(relative))
    }

    async fn existing_object_path(&self, bucket: &str, key: &str) -> Result<PathBuf> {
        let path = self.object_path(bucket, key)?;
        if !fs::try_exists(&path).await? || !fs::metadata(&path).await?.is_file() {
            return Err(Error::NoSuchKey(key.to_string()));
        }
        Ok(path)
    }
}

#[async_trait]
impl ObjectStore for LocalStore {
    async fn put_object(&self, request: PutObject) -> Result<String> {
        let path = self.object_path(&request.bucket, &request.key)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut file = fs::File::create(&path).await?;
        file.write_all(&request.body).await?;
        file.sync_all().await?;

        debug!(
            "Stored object {}/{} ({} bytes)",
            request.bucket,
            request.key,
            request.body.len()
        );

        Ok(request.key)
    }

    async fn get_object(
        &self,
        bucket: &str,
        key: &str,
        range: Option<ChunkRequest>,
    ) -> Result<ObjectData> {
        let path = self.existing_object_path(bucket, key).await?;
        let content_type = Some(guess_content_type(key));

        let Some(chunk) = range else {
            let data = fs::read(&path).await?;
            debug!("Retrieved object {}/{} ({} bytes)", bucket, key, data.len());
            return Ok(ObjectData {
                content_length: data.len() as u64,
                body: Bytes::from(data),
                content_type,
                etag: None,
                range: None,
            });
        };

        let size = fs::metadata(&path).await?.len() as i64;
        if chunk.start < 0 || chunk.start > chunk.end || chunk.start >= size {
            return Err(Error::InvalidRange(format!(
                "Range {} not satisfiable for {} bytes",
                chunk.range_header(),
                size
            )));
        }
        // Same clamping S3 applies to an end past the last byte
        let served = ChunkRequest::new(chunk.start, chunk.end.min(size - 1));

        let mut file = fs::File::open(&path).await?;
        file.seek(std::io::SeekFrom::Start(served.start as u64)).await?;
        let mut buffer = vec![0u8; served.chunk_size as usize];
        file.read_exact(&mut buffer).await?;

        debug!(
            "Retrieved {} of {}/{} ({} bytes)",
            served.range_header(),
            bucket,
            key,
            buffer.len()
        );

        Ok(ObjectData {
            content_length: buffer.len() as u64,
            body: Bytes::from(buffer),
            content_type,
            etag: None,
            range: Some(served),
        })
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        let path = self.object_path(bucket, key)?;

        if fs::try_exists(&path).await? {
            fs::remove_file(&path).await?;
            debug!("Deleted object {}/{}", bucket, key);
        }

        Ok(())
    }

    async fn delete_objects(&self, bucket: &str, keys: &[String]) -> Result<()> {
        try_join_all(keys.iter().map(|key| self.delete_object(bucket, key))).await?;
        Ok(())
    }

    async fn head_object(&self, bucket: &str, key: &str) -> Result<u64> {
        let path = self.existing_object_path(bucket, key).await?;
        Ok(fs::metadata(&path).await?.len())
    }

    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<String>> {
        let root = self.bucket_path(bucket)?;
        let wanted = prefix.to_string();

        let keys = tokio::task::spawn_blocking(move || -> Result<Vec<String>> {
            if !root.exists() {
                return Ok(Vec::new());
            }

            let mut keys = Vec::new();
            for entry in walkdir::WalkDir::new(&root) {
                let entry = entry.map_err(|e| Error::Other(e.into()))?;
                if !entry.file_type().is_file() {
                    continue;
                }
                let Ok(relative) = entry.path().strip_prefix(&root) else {
                    continue;
                };
                let key = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                if key.starts_with(&wanted) {
                    keys.push(key);
                }
            }
            keys.sort();
            Ok(keys)
        })
        .await
        .map_err(|e| Error::Other(e.into()))??;

        debug!("Listed {} object(s) in {} under '{}'", keys.len(), bucket, prefix);
        Ok(keys)
    }
}
