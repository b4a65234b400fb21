// catalog_core/src/memory.rs

//! In-process `CatalogStore` and `ObjectStore` implementations, used by the
//! test suites and benches and handy for running the service without Postgres or S3.

use crate::codec;
use crate::error::{CatalogError, CatalogResult};
use crate::model::{NewStoredProduct, ProductId, StoredProduct, StoredUpdate};
use crate::object_store::ObjectStore;
use crate::store::CatalogStore;
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeMap;

#[derive(Debug, Default)]
struct Table {
  rows: BTreeMap<ProductId, StoredProduct>,
  last_id: ProductId,
}

/// A product table kept in a `BTreeMap`. Ids start at 1 and are never reused.
#[derive(Debug, Default)]
pub struct MemoryCatalogStore {
  table: RwLock<Table>,
}

impl MemoryCatalogStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Puts a row in verbatim, bypassing the codec. Lets tests plant corrupt rows.
  pub fn insert_raw(&self, row: StoredProduct) {
    let mut table = self.table.write();
    table.last_id = table.last_id.max(row.id);
    table.rows.insert(row.id, row);
  }

  pub fn len(&self) -> usize {
    self.table.read().rows.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  fn newest_first(&self, keep: impl Fn(&StoredProduct) -> bool) -> Vec<StoredProduct> {
    self.table.read().rows.values().rev().filter(|row| keep(row)).cloned().collect()
  }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
  async fn list(&self) -> CatalogResult<Vec<StoredProduct>> {
    Ok(self.newest_first(|_| true))
  }

  async fn fetch(&self, id: ProductId) -> CatalogResult<Option<StoredProduct>> {
    Ok(self.table.read().rows.get(&id).cloned())
  }

  async fn search_by_name(&self, fragment: &str) -> CatalogResult<Vec<StoredProduct>> {
    let needle = fragment.to_lowercase();
    Ok(self.newest_first(|row| row.name.to_lowercase().contains(&needle)))
  }

  async fn filter_by_category(&self, label: &str) -> CatalogResult<Vec<StoredProduct>> {
    // Rows whose categories don't decode never match, mirroring a SQL predicate over the array.
    Ok(self.newest_first(|row| {
      codec::decode_categories(&row.categories)
        .map(|categories| codec::categories_match(&categories, label))
        .unwrap_or(false)
    }))
  }

  async fn insert(&self, row: NewStoredProduct) -> CatalogResult<ProductId> {
    let mut table = self.table.write();
    let id = table
      .last_id
      .checked_add(1)
      .ok_or_else(|| CatalogError::store("product id sequence exhausted"))?;
    table.last_id = id;
    table.rows.insert(
      id,
      StoredProduct {
        id,
        name: row.name,
        description: row.description,
        price: row.price,
        seller: row.seller,
        images: row.images,
        categories: row.categories,
      },
    );
    Ok(id)
  }

  async fn update(&self, id: ProductId, row: StoredUpdate) -> CatalogResult<Option<StoredProduct>> {
    let mut table = self.table.write();
    let Some(existing) = table.rows.get_mut(&id) else {
      return Ok(None);
    };
    existing.name = row.name;
    existing.description = row.description;
    existing.price = row.price;
    existing.seller = row.seller;
    existing.categories = row.categories;
    Ok(Some(existing.clone()))
  }

  async fn delete(&self, id: ProductId) -> CatalogResult<u64> {
    Ok(u64::from(self.table.write().rows.remove(&id).is_some()))
  }
}

/// Keeps every uploaded object in a map and hands out `memory://{key}` locators.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
  objects: Mutex<BTreeMap<String, Bytes>>,
}

impl MemoryObjectStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn object(&self, key: &str) -> Option<Bytes> {
    self.objects.lock().get(key).cloned()
  }

  pub fn keys(&self) -> Vec<String> {
    self.objects.lock().keys().cloned().collect()
  }

  pub fn len(&self) -> usize {
    self.objects.lock().len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
  async fn put_object(&self, key: &str, body: Bytes, _content_type: Option<&str>) -> anyhow::Result<String> {
    self.objects.lock().insert(key.to_string(), body);
    Ok(format!("memory://{}", key))
  }
}
