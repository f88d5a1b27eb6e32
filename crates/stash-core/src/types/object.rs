//! Object types

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ChunkRequest;

/// Canned ACL applied to a stored object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectAcl {
    #[default]
    Private,
    PublicRead,
    PublicReadWrite,
    AuthenticatedRead,
    BucketOwnerRead,
    BucketOwnerFullControl,
}

impl ObjectAcl {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectAcl::Private => "private",
            ObjectAcl::PublicRead => "public-read",
            ObjectAcl::PublicReadWrite => "public-read-write",
            ObjectAcl::AuthenticatedRead => "authenticated-read",
            ObjectAcl::BucketOwnerRead => "bucket-owner-read",
            ObjectAcl::BucketOwnerFullControl => "bucket-owner-full-control",
        }
    }
}

impl fmt::Display for ObjectAcl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectAcl {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "private" => Ok(ObjectAcl::Private),
            "public-read" => Ok(ObjectAcl::PublicRead),
            "public-read-write" => Ok(ObjectAcl::PublicReadWrite),
            "authenticated-read" => Ok(ObjectAcl::AuthenticatedRead),
            "bucket-owner-read" => Ok(ObjectAcl::BucketOwnerRead),
            "bucket-owner-full-control" => Ok(ObjectAcl::BucketOwnerFullControl),
            other => Err(crate::Error::InvalidArgument(format!(
                "Unknown ACL: {}",
                other
            ))),
        }
    }
}

/// A put request against the object store
#[derive(Debug, Clone)]
pub struct PutObject {
    pub bucket: String,
    pub key: String,
    pub body: Bytes,
    pub acl: Option<ObjectAcl>,
    pub content_type: Option<String>,
}

impl PutObject {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            body: body.into(),
            acl: None,
            content_type: None,
        }
    }

    pub fn with_acl(mut self, acl: ObjectAcl) -> Self {
        self.acl = Some(acl);
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Object body and metadata returned by a get
#[derive(Debug, Clone)]
pub struct ObjectData {
    pub body: Bytes,
    pub content_type: Option<String>,
    pub content_length: u64,
    pub etag: Option<String>,
    /// Set when only part of the object was requested
    pub range: Option<ChunkRequest>,
}

impl ObjectData {
    pub fn is_partial(&self) -> bool {
        self.range.is_some()
    }
}
