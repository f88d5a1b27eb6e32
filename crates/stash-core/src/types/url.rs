//! Public object URLs

use crate::error::{Error, Result};
use crate::S3_URL_MARKER;

/// Public URL of an object: `https://s3.{region}.amazonaws.com/{bucket}/{key}`.
pub fn object_url(region: &str, bucket: &str, key: &str) -> String {
    format!("https://s3.{}.{}{}/{}", region, S3_URL_MARKER, bucket, key)
}

/// Recover the object key from a URL built by [`object_url`].
///
/// Everything after the first `amazonaws.com/` is split at the next `/`; the
/// part before it is the bucket and the rest is the key.
pub fn key_from_url(url: &str) -> Result<String> {
    let (_, post_domain) = url
        .split_once(S3_URL_MARKER)
        .ok_or_else(|| Error::InvalidUrl(format!("'{}' is not an S3 object URL", url)))?;

    let key = match post_domain.split_once('/') {
        Some((_bucket, key)) => key,
        None => post_domain,
    };

    Ok(key.to_string())
}
