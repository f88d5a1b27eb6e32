//! S3 backend built on the AWS SDK

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_s3::config::Builder as S3ConfigBuilder;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{Delete, ObjectCannedAcl, ObjectIdentifier};
use aws_sdk_s3::Client;
use stash_core::config::S3Config;
use stash_core::types::{object_url, ChunkRequest, ObjectData, PutObject};
use stash_core::{Error, Result, MAX_DELETE_BATCH};
use tracing::debug;

use crate::engine::ObjectStore;

/// Object store backed by an S3-compatible service
#[derive(Clone, Debug)]
pub struct S3Store {
    client: Client,
    region: String,
    bucket: String,
}

impl S3Store {
    /// Build a client from configuration.
    ///
    /// Static keys are used when configured; otherwise the SDK's own provider
    /// chain resolves credentials.
    pub async fn from_config(config: &S3Config) -> Result<Self> {
        config.validate()?;

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));

        if let (Some(access_key), Some(secret_key)) = (&config.access_key, &config.secret_key) {
            let credentials = Credentials::new(access_key, secret_key, None, None, "stash");
            loader = loader.credentials_provider(credentials);
        }

        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;
        let s3_config = S3ConfigBuilder::from(&sdk_config)
            .force_path_style(config.path_style)
            .build();

        debug!(
            "S3 client ready for bucket '{}' in {}",
            config.bucket, config.region
        );

        Ok(Self::from_client(
            Client::from_conf(s3_config),
            config.region.clone(),
            config.bucket.clone(),
        ))
    }

    pub fn from_client(client: Client, region: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            client,
            region: region.into(),
            bucket: bucket.into(),
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Bucket the store was configured with
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Public URL of `key` in the configured bucket
    pub fn url_of(&self, key: &str) -> String {
        object_url(&self.region, &self.bucket, key)
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put_object(&self, request: PutObject) -> Result<String> {
        let size = request.body.len();
        let mut req = self
            .client
            .put_object()
            .bucket(&request.bucket)
            .key(&request.key)
            .body(ByteStream::from(request.body));

        if let Some(acl) = request.acl {
            req = req.acl(ObjectCannedAcl::from(acl.as_str()));
        }
        if let Some(content_type) = &request.content_type {
            req = req.content_type(content_type);
        }

        req.send().await.map_err(Error::transport)?;
        debug!("Put s3://{}/{} ({} bytes)", request.bucket, request.key, size);

        Ok(request.key)
    }

    async fn get_object(
        &self,
        bucket: &str,
        key: &str,
        range: Option<ChunkRequest>,
    ) -> Result<ObjectData> {
        let mut req = self.client.get_object().bucket(bucket).key(key);
        if let Some(chunk) = &range {
            req = req.range(chunk.range_header());
        }

        let resp = req.send().await.map_err(Error::transport)?;

        let content_type = resp.content_type().map(str::to_string);
        let etag = resp.e_tag().map(str::to_string);
        let body = resp
            .body
            .collect()
            .await
            .map_err(Error::transport)?
            .into_bytes();

        debug!("Got s3://{}/{} ({} bytes)", bucket, key, body.len());

        Ok(ObjectData {
            content_length: body.len() as u64,
            body,
            content_type,
            etag,
            range,
        })
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(Error::transport)?;

        debug!("Deleted s3://{}/{}", bucket, key);
        Ok(())
    }

    async fn delete_objects(&self, bucket: &str, keys: &[String]) -> Result<()> {
        for chunk in keys.chunks(MAX_DELETE_BATCH) {
            let identifiers = chunk
                .iter()
                .map(|key| ObjectIdentifier::builder().key(key).build())
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(Error::transport)?;

            let delete = Delete::builder()
                .set_objects(Some(identifiers))
                .quiet(true)
                .build()
                .map_err(Error::transport)?;

            let resp = self
                .client
                .delete_objects()
                .bucket(bucket)
                .delete(delete)
                .send()
                .await
                .map_err(Error::transport)?;

            if let Some(failed) = resp.errors().first() {
                return Err(Error::Other(anyhow::anyhow!(
                    "Failed to delete s3://{}/{}: {}",
                    bucket,
                    failed.key().unwrap_or(""),
                    failed.message().unwrap_or("unknown error")
                )));
            }

            debug!("Deleted {} object(s) from {}", chunk.len(), bucket);
        }

        Ok(())
    }

    async fn head_object(&self, bucket: &str, key: &str) -> Result<u64> {
        let resp = self
            .client
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(Error::transport)?;

        Ok(resp.content_length().unwrap_or(0).max(0) as u64)
    }

    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut req = self.client.list_objects_v2().bucket(bucket).prefix(prefix);

            if let Some(token) = &continuation_token {
                req = req.continuation_token(token);
            }

            let resp = req.send().await.map_err(Error::transport)?;

            keys.extend(
                resp.contents()
                    .iter()
                    .filter_map(|obj| obj.key().map(str::to_string)),
            );

            if resp.is_truncated().unwrap_or(false) {
                continuation_token = resp.next_continuation_token().map(str::to_string);
                if continuation_token.is_none() {
                    break;
                }
            } else {
                break;
            }
        }

        debug!("Listed {} object(s) in {} under '{}'", keys.len(), bucket, prefix);
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_store() -> S3Store {
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("eu-west-1"))
            .build();
        S3Store::from_client(Client::from_conf(config), "eu-west-1", "media")
    }

    #[test]
    fn test_url_of() {
        let store = offline_store();
        assert_eq!(store.bucket(), "media");
        assert_eq!(store.region(), "eu-west-1");
        assert_eq!(
            store.url_of("avatars/u1.png"),
            "https://s3.eu-west-1.amazonaws.com/media/avatars/u1.png"
        );
    }

    #[tokio::test]
    async fn test_from_config_requires_bucket() {
        let config = S3Config::default();
        let err = S3Store::from_config(&config).await.unwrap_err();
        assert_eq!(err.code(), "CONFIG_ERROR");
    }

    #[tokio::test]
    async fn test_from_config_with_static_keys() {
        let config = S3Config {
            bucket: "media".into(),
            endpoint: Some("http://localhost:9000".into()),
            path_style: true,
            access_key: Some("minioadmin".into()),
            secret_key: Some("minioadmin".into()),
            ..Default::default()
        };
        let store = S3Store::from_config(&config).await.unwrap();
        assert_eq!(store.bucket(), "media");
        assert_eq!(store.region(), "us-east-1");
    }
}
