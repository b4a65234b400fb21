// catalog_core/src/object_store.rs

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};

/// Key prefix every uploaded object lands under.
pub const UPLOAD_PREFIX: &str = "uploads";

/// Durable blob storage for uploaded images.
#[async_trait]
pub trait ObjectStore: Send + Sync {
  /// Stores `body` under `key` and returns a publicly resolvable locator URL.
  async fn put_object(&self, key: &str, body: Bytes, content_type: Option<&str>) -> anyhow::Result<String>;
}

/// Last path component of a client-supplied file name. Browsers on Windows
/// have been known to send full `C:\...` paths, so both separators count.
pub fn base_name(file_name: &str) -> &str {
  let name = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name).trim();
  if name.is_empty() || name == "." || name == ".." {
    "upload"
  } else {
    name
  }
}

/// `uploads/{unix_millis}-{position}-{base_name}`.
///
/// The timestamp keeps keys apart across requests; the submission position keeps
/// same-named files of one request apart.
pub fn object_key(at: DateTime<Utc>, position: usize, file_name: &str) -> String {
  format!("{}/{}-{}-{}", UPLOAD_PREFIX, at.timestamp_millis(), position, base_name(file_name))
}
