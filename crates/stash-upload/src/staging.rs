//! Local staging of incoming files

use serde::{Deserialize, Serialize};
use stash_core::config::UploadConfig;
use stash_core::Result;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

/// A file received from a client and written to the staging directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedFile {
    /// Name the client gave the file
    pub original_name: String,
    pub destination: PathBuf,
    /// Name of the staged copy inside `destination`
    pub filename: String,
    pub size: u64,
}

impl StagedFile {
    pub fn path(&self) -> PathBuf {
        self.destination.join(&self.filename)
    }
}

/// Writes incoming files to `{destination}/{prefix}-{uuid}`
#[derive(Debug, Clone)]
pub struct DiskStaging {
    destination: PathBuf,
    file_name_prefix: String,
}

impl DiskStaging {
    pub fn new(destination: impl AsRef<Path>, file_name_prefix: impl Into<String>) -> Self {
        Self {
            destination: destination.as_ref().to_path_buf(),
            file_name_prefix: file_name_prefix.into(),
        }
    }

    pub fn from_config(config: &UploadConfig) -> Self {
        Self::new(&config.staging_dir, config.file_name_prefix.clone())
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    fn next_filename(&self) -> String {
        format!("{}-{}", self.file_name_prefix, Uuid::new_v4())
    }

    /// Write `data` to a fresh staging file.
    pub async fn stage(&self, original_name: &str, data: &[u8]) -> Result<StagedFile> {
        fs::create_dir_all(&self.destination).await?;

        let filename = self.next_filename();
        let path = self.destination.join(&filename);

        let mut file = fs::File::create(&path).await?;
        if let Err(e) = file.write_all(data).await {
            drop(file);
            let _ = fs::remove_file(&path).await;
            return Err(e.into());
        }
        file.flush().await?;

        debug!("Staged {} as {:?} ({} bytes)", original_name, path, data.len());

        Ok(StagedFile {
            original_name: original_name.to_string(),
            destination: self.destination.clone(),
            filename,
            size: data.len() as u64,
        })
    }
}

/// Owns a staged file and deletes it exactly once.
///
/// Call [`TempFileGuard::release`] on the normal path; if the guard is dropped
/// instead (an early `?`, a panic, a cancelled future) the file is removed
/// synchronously in `Drop`.
#[derive(Debug)]
pub struct TempFileGuard {
    path: PathBuf,
    armed: bool,
}

impl TempFileGuard {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            armed: true,
        }
    }

    pub fn for_file(file: &StagedFile) -> Self {
        Self::new(file.path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the file now. A file that is already gone counts as deleted.
    pub async fn release(mut self) {
        self.armed = false;
        match fs::remove_file(&self.path).await {
            Ok(()) => debug!("Removed staged file {:?}", self.path),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove staged file {:?}: {}", self.path, e),
        }
    }
}

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed staged file {:?} on drop", self.path),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove staged file {:?}: {}", self.path, e),
        }
    }
}

/// Files attached to a request: either a flat list or grouped by form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilesField {
    List(Vec<StagedFile>),
    Fields(BTreeMap<String, Vec<StagedFile>>),
}

/// Flatten request files into a single list
pub fn collapse_files(files: FilesField) -> Vec<StagedFile> {
    match files {
        FilesField::List(files) => files,
        FilesField::Fields(fields) => fields.into_values().flatten().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_stage_names_and_content() {
        let dir = TempDir::new().unwrap();
        let staging = DiskStaging::new(dir.path().join("incoming"), "avatar");

        let staged = staging.stage("me.png", b"not really a png").await.unwrap();
        assert_eq!(staged.original_name, "me.png");
        assert_eq!(staged.size, 16);
        assert!(staged.filename.starts_with("avatar-"));
        assert_eq!(staged.filename.len(), "avatar-".len() + 36);
        assert_eq!(
            std::fs::read(staged.path()).unwrap(),
            b"not really a png".to_vec()
        );

        let other = staging.stage("me.png", b"x").await.unwrap();
        assert_ne!(staged.filename, other.filename);
    }

    #[tokio::test]
    async fn test_guard_release() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("staged");
        std::fs::write(&path, b"data").unwrap();

        let guard = TempFileGuard::new(&path);
        assert_eq!(guard.path(), path.as_path());
        guard.release().await;
        assert!(!path.exists());
    }

    #[test]
    fn test_guard_drop_removes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("staged");
        std::fs::write(&path, b"data").unwrap();

        {
            let _guard = TempFileGuard::new(&path);
        }
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_guard_missing_file_is_fine() {
        let dir = TempDir::new().unwrap();
        TempFileGuard::new(dir.path().join("never-written")).release().await;
        drop(TempFileGuard::new(dir.path().join("never-written")));
    }

    fn staged(name: &str) -> StagedFile {
        StagedFile {
            original_name: name.to_string(),
            destination: PathBuf::from("/tmp"),
            filename: format!("upload-{}", name),
            size: 1,
        }
    }

    #[test]
    fn test_collapse_files() {
        let list = FilesField::List(vec![staged("a"), staged("b")]);
        assert_eq!(collapse_files(list).len(), 2);

        let mut fields = BTreeMap::new();
        fields.insert("cover".to_string(), vec![staged("c")]);
        fields.insert("gallery".to_string(), vec![staged("g1"), staged("g2")]);
        let names: Vec<String> = collapse_files(FilesField::Fields(fields))
            .into_iter()
            .map(|f| f.original_name)
            .collect();
        assert_eq!(names, vec!["c", "g1", "g2"]);

        assert!(collapse_files(FilesField::Fields(BTreeMap::new())).is_empty());
    }

    #[test]
    fn test_files_field_deserializes_both_shapes() {
        let file = r#"{"original_name":"a.png","destination":"/tmp","filename":"upload-1","size":3}"#;

        let list: FilesField = serde_json::from_str(&format!("[{}]", file)).unwrap();
        assert!(matches!(list, FilesField::List(ref v) if v.len() == 1));

        let fields: FilesField =
            serde_json::from_str(&format!(r#"{{"photos":[{},{}]}}"#, file, file)).unwrap();
        assert_eq!(collapse_files(fields).len(), 2);
    }
}
