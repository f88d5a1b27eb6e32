//! Store selection and object target parsing

use anyhow::{Context, Result};
use stash_core::config::S3Config;
use stash_core::S3_URL_MARKER;
use stash_storage::{LocalStore, ObjectStore, S3Store};
use std::path::Path;
use std::sync::Arc;

/// Open the S3 store, or a local directory store when `local` is given
pub async fn open_store(config: &S3Config, local: Option<&Path>) -> Result<Arc<dyn ObjectStore>> {
    match local {
        Some(dir) => {
            let store = LocalStore::new(dir);
            store
                .init()
                .await
                .with_context(|| format!("Failed to prepare local store at {:?}", dir))?;
            Ok(Arc::new(store))
        }
        None => {
            let store = S3Store::from_config(config)
                .await
                .context("Failed to create S3 client")?;
            Ok(Arc::new(store))
        }
    }
}

/// An object named on the command line, either by key or by public URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Key(String),
    Url(String),
}

impl Target {
    pub fn parse(arg: &str) -> Self {
        if is_object_url(arg) {
            Target::Url(arg.to_string())
        } else {
            Target::Key(arg.trim_start_matches('/').to_string())
        }
    }
}

/// Check if an argument is a public object URL rather than a key
pub fn is_object_url(arg: &str) -> bool {
    arg.starts_with("https://") || arg.starts_with("http://") || arg.contains(S3_URL_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_target() {
        assert_eq!(
            Target::parse("avatars/u1.png"),
            Target::Key("avatars/u1.png".to_string())
        );
        assert_eq!(
            Target::parse("/avatars/u1.png"),
            Target::Key("avatars/u1.png".to_string())
        );
        assert_eq!(
            Target::parse("https://s3.us-east-1.amazonaws.com/media/a.png"),
            Target::Url("https://s3.us-east-1.amazonaws.com/media/a.png".to_string())
        );
        assert!(is_object_url("s3.eu-west-1.amazonaws.com/media/a.png"));
        assert!(!is_object_url("media/a.png"));
    }

    #[tokio::test]
    async fn test_open_local_store() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("objects");

        let store = open_store(&S3Config::default(), Some(&root)).await.unwrap();
        assert!(root.is_dir());
        assert!(store.list_objects("media", "").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_open_s3_store_needs_bucket() {
        let err = open_store(&S3Config::default(), None).await.err().unwrap();
        assert!(err.to_string().contains("Failed to create S3 client"));
    }
}
