// catalog_core/src/store.rs

//! The catalog store seam. Implementations deal only in stored forms; the
//! service runs the attribute codec on both sides of every call.

use crate::error::CatalogResult;
use crate::model::{NewStoredProduct, ProductId, StoredProduct, StoredUpdate};
use async_trait::async_trait;

/// A relational table of product rows.
///
/// Every failure is reported as `CatalogError::Store` carrying the driver's
/// message. "No matching row" is *not* a failure here: `fetch`/`update` return
/// `None` and `delete` returns the affected row count.
#[async_trait]
pub trait CatalogStore: Send + Sync {
  /// All rows, newest first (`id` descending).
  async fn list(&self) -> CatalogResult<Vec<StoredProduct>>;

  async fn fetch(&self, id: ProductId) -> CatalogResult<Option<StoredProduct>>;

  /// Rows whose name contains `fragment`, ignoring case. Newest first.
  async fn search_by_name(&self, fragment: &str) -> CatalogResult<Vec<StoredProduct>>;

  /// Rows carrying `label` among their categories, ignoring case. Newest first.
  async fn filter_by_category(&self, label: &str) -> CatalogResult<Vec<StoredProduct>>;

  /// Writes a new row and returns the id the store assigned.
  async fn insert(&self, row: NewStoredProduct) -> CatalogResult<ProductId>;

  /// Replaces the mutable fields of row `id` in one statement and returns the
  /// row as now stored. Never inserts.
  async fn update(&self, id: ProductId, row: StoredUpdate) -> CatalogResult<Option<StoredProduct>>;

  async fn delete(&self, id: ProductId) -> CatalogResult<u64>;
}
