//! Object storage for processed videos

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use std::path::Path;
use std::time::Instant;
use tracing::{error, info};

use crate::error::{StorageError, StorageResult};

/// Remote blob storage addressed by key
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload the file at `path` under `key` in a single put
    async fn put_file(&self, key: &str, content_type: &str, path: &Path) -> StorageResult<()>;

    /// Public URL of the object stored under `key`
    fn public_url(&self, key: &str) -> String;
}

/// Bucket coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for S3-compatible providers (MinIO, R2, ...)
    pub endpoint_url: Option<String>,
}

impl S3Config {
    /// Virtual-hosted AWS URL, or path-style under a custom endpoint
    pub fn public_url(&self, key: &str) -> String {
        match &self.endpoint_url {
            Some(endpoint) => format!(
                "{}/{}/{}",
                endpoint.trim_end_matches('/'),
                self.bucket,
                key
            ),
            None => format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, key
            ),
        }
    }
}

/// [`ObjectStore`] backed by the AWS SDK
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
    config: S3Config,
}

impl S3ObjectStore {
    /// Build a client from the default AWS credential chain
    pub async fn new(config: S3Config) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()))
            .load()
            .await;

        let client = match &config.endpoint_url {
            Some(endpoint) => {
                let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
                    .endpoint_url(endpoint)
                    .force_path_style(true)
                    .build();
                Client::from_conf(s3_config)
            }
            None => Client::new(&sdk_config),
        };

        info!(bucket = %config.bucket, region = %config.region, "S3 client initialized");
        Self { client, config }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_file(&self, key: &str, content_type: &str, path: &Path) -> StorageResult<()> {
        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| StorageError::Read {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        let start = Instant::now();
        self.client
            .put_object()
            .bucket(&self.config.bucket)
            .key(key)
            .body(body)
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                error!(
                    bucket = %self.config.bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "S3 upload failed: {}",
                    DisplayErrorContext(&e)
                );
                StorageError::Upload {
                    key: key.to_string(),
                    message: DisplayErrorContext(&e).to_string(),
                }
            })?;

        info!(
            bucket = %self.config.bucket,
            key = %key,
            duration_ms = start.elapsed().as_millis() as u64,
            "Uploaded object"
        );
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        self.config.public_url(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(endpoint_url: Option<&str>) -> S3Config {
        S3Config {
            bucket: "tubely-12345".to_string(),
            region: "us-east-2".to_string(),
            endpoint_url: endpoint_url.map(str::to_string),
        }
    }

    #[test]
    fn test_aws_url() {
        assert_eq!(
            config(None).public_url("landscape/abc.mp4"),
            "https://tubely-12345.s3.us-east-2.amazonaws.com/landscape/abc.mp4"
        );
    }

    #[test]
    fn test_custom_endpoint_url_is_path_style() {
        assert_eq!(
            config(Some("http://localhost:9000/")).public_url("other/abc.mp4"),
            "http://localhost:9000/tubely-12345/other/abc.mp4"
        );
    }
}
