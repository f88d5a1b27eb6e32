//! Configuration for Stash
//!
//! Example config:
//! ```toml
//! [s3]
//! region = "eu-west-1"
//! bucket = "user-media"
//!
//! [upload]
//! staging_dir = "/tmp/stash"
//! file_name_prefix = "upload"
//! directory = "avatars"
//! acl = "public-read"
//!
//! [logging]
//! level = "debug"
//! format = "json"
//! ```

use crate::types::ObjectAcl;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StashConfig {
    #[serde(default)]
    pub s3: S3Config,

    #[serde(default)]
    pub upload: UploadConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StashConfig {
    pub fn from_file(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::Error::Config(format!("Failed to read {:?}: {}", path, e)))?;

        let config = Self::from_toml(&content)?;
        tracing::debug!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Override fields with any `STASH_*` variables present in the environment.
    pub fn apply_env(&mut self) {
        if let Ok(region) = std::env::var("STASH_REGION") {
            self.s3.region = region;
        }
        if let Ok(bucket) = std::env::var("STASH_BUCKET") {
            self.s3.bucket = bucket;
        }
        if let Ok(endpoint) = std::env::var("STASH_ENDPOINT") {
            self.s3.endpoint = Some(endpoint);
        }
        if let Ok(key) = std::env::var("STASH_ACCESS_KEY") {
            self.s3.access_key = Some(key);
        }
        if let Ok(secret) = std::env::var("STASH_SECRET_KEY") {
            self.s3.secret_key = Some(secret);
        }
        if let Ok(dir) = std::env::var("STASH_STAGING_DIR") {
            self.upload.staging_dir = PathBuf::from(dir);
        }
        if let Ok(level) = std::env::var("STASH_LOG_LEVEL") {
            self.logging.level = level;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct S3Config {
    pub region: String,
    pub bucket: String,
    /// Custom endpoint for S3-compatible services
    pub endpoint: Option<String>,
    /// Use path-style addressing instead of virtual-hosted style
    pub path_style: bool,
    /// Static credentials; the SDK provider chain is used when unset
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            region: crate::DEFAULT_REGION.to_string(),
            bucket: String::new(),
            endpoint: None,
            path_style: false,
            access_key: None,
            secret_key: None,
        }
    }
}

impl S3Config {
    pub fn validate(&self) -> crate::Result<()> {
        if self.bucket.is_empty() {
            return Err(crate::Error::Config(
                "Bucket not configured. Set STASH_BUCKET or [s3].bucket".into(),
            ));
        }
        if self.region.is_empty() {
            return Err(crate::Error::Config("Region must not be empty".into()));
        }
        if self.access_key.is_some() != self.secret_key.is_some() {
            return Err(crate::Error::Config(
                "access_key and secret_key must be set together".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Where incoming files are staged before being sent to the bucket
    pub staging_dir: PathBuf,
    pub file_name_prefix: String,
    /// Key prefix ("directory") for uploaded objects
    pub directory: String,
    pub acl: ObjectAcl,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            staging_dir: std::env::temp_dir().join("stash"),
            file_name_prefix: "upload".to_string(),
            directory: "uploads".to_string(),
            acl: ObjectAcl::PublicRead,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// "text" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = StashConfig::default();
        assert_eq!(config.s3.region, "us-east-1");
        assert!(config.s3.bucket.is_empty());
        assert_eq!(config.upload.acl, ObjectAcl::PublicRead);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_toml() {
        let config = StashConfig::from_toml(
            r#"
            [s3]
            region = "eu-west-1"
            bucket = "media"
            path_style = true
            "#,
        )
        .unwrap();

        assert_eq!(config.s3.region, "eu-west-1");
        assert_eq!(config.s3.bucket, "media");
        assert!(config.s3.path_style);
        assert_eq!(config.upload.directory, "uploads");
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[upload]\nstaging_dir = \"/srv/staging\"\nfile_name_prefix = \"img\"\ndirectory = \"avatars\"\nacl = \"private\""
        )
        .unwrap();

        let config = StashConfig::from_file(file.path()).unwrap();
        assert_eq!(config.upload.staging_dir, PathBuf::from("/srv/staging"));
        assert_eq!(config.upload.directory, "avatars");
        assert_eq!(config.upload.acl, ObjectAcl::Private);
    }

    #[test]
    fn test_bad_toml() {
        let err = StashConfig::from_toml("[s3\nregion = 1").unwrap_err();
        assert_eq!(err.code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_s3_validate() {
        let mut s3 = S3Config::default();
        assert!(s3.validate().is_err());

        s3.bucket = "media".into();
        assert!(s3.validate().is_ok());

        s3.access_key = Some("AKIA".into());
        assert!(s3.validate().is_err());

        s3.secret_key = Some("secret".into());
        assert!(s3.validate().is_ok());
    }
}
