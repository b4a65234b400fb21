// catalog_app/src/storage/s3.rs

use crate::config::S3Config;
use anyhow::Context;
use async_trait::async_trait;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use catalog_core::ObjectStore;
use tracing::{error, info, instrument};

/// Uploads into one bucket and hands back `{public_base_url}/{key}` locators.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
  client: S3Client,
  bucket: String,
  public_base_url: String,
}

impl S3ObjectStore {
  pub fn new(client: S3Client, config: &S3Config) -> Self {
    Self {
      client,
      bucket: config.bucket.clone(),
      public_base_url: config.public_base_url.clone(),
    }
  }

  /// Builds the SDK client for the configured region. Static keys win when both
  /// are set; otherwise the default provider chain (profile, IMDS, ...) is used.
  pub async fn from_config(config: &S3Config) -> Self {
    let mut loader =
      aws_config::defaults(aws_config::BehaviorVersion::latest()).region(aws_config::Region::new(config.region.clone()));
    if let (Some(key_id), Some(secret)) = (&config.access_key_id, &config.secret_access_key) {
      loader = loader.credentials_provider(Credentials::new(key_id, secret, None, None, "catalog-env"));
    }
    let sdk_config = loader.load().await;
    info!(bucket = %config.bucket, region = %config.region, "S3 client configured.");
    Self::new(S3Client::new(&sdk_config), config)
  }

  pub fn locator(&self, key: &str) -> String {
    format!("{}/{}", self.public_base_url, key)
  }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
  #[instrument(name = "s3::put_object", skip(self, body), fields(bucket = %self.bucket, bytes = body.len()))]
  async fn put_object(&self, key: &str, body: Bytes, content_type: Option<&str>) -> anyhow::Result<String> {
    self
      .client
      .put_object()
      .bucket(&self.bucket)
      .key(key)
      .body(ByteStream::from(body))
      .set_content_type(content_type.map(str::to_string))
      .send()
      .await
      .map_err(|e| {
        error!(error = %DisplayErrorContext(&e), "S3 upload failed");
        anyhow::anyhow!("{}", DisplayErrorContext(&e))
      })
      .with_context(|| format!("failed to put object {} in bucket {}", key, self.bucket))?;
    Ok(self.locator(key))
  }
}
