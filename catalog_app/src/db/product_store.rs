// catalog_app/src/db/product_store.rs

use crate::models::ProductRow;
use async_trait::async_trait;
use catalog_core::model::{NewStoredProduct, StoredUpdate};
use catalog_core::{CatalogError, CatalogResult, CatalogStore, ProductId, StoredProduct};
use sqlx::PgPool;
use tracing::{error, instrument};

// Collection columns come back as text so the codec sees exactly what Postgres stores.
const PRODUCT_COLUMNS: &str = "item_id, item_name, COALESCE(item_desc, '') AS item_desc, \
   item_price::float8 AS item_price, COALESCE(seller, '') AS seller, \
   COALESCE(image_url::text, '[]') AS image_url, COALESCE(categories::text, '{}') AS categories";

/// `CatalogStore` over the `products` table (see `schema.sql`).
#[derive(Debug, Clone)]
pub struct PgCatalogStore {
  pool: PgPool,
}

impl PgCatalogStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

fn db_error(operation: &'static str) -> impl FnOnce(sqlx::Error) -> CatalogError {
  move |e| {
    error!(operation, error = %e, "Database query failed.");
    CatalogError::store(e)
  }
}

/// Escapes LIKE metacharacters so a fragment only ever matches literally.
fn like_pattern(fragment: &str) -> String {
  let mut pattern = String::with_capacity(fragment.len() + 2);
  pattern.push('%');
  for c in fragment.chars() {
    if matches!(c, '%' | '_' | '\\') {
      pattern.push('\\');
    }
    pattern.push(c);
  }
  pattern.push('%');
  pattern
}

fn into_stored(rows: Vec<ProductRow>) -> Vec<StoredProduct> {
  rows.into_iter().map(StoredProduct::from).collect()
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
  #[instrument(name = "db::list_products", skip(self))]
  async fn list(&self) -> CatalogResult<Vec<StoredProduct>> {
    let rows: Vec<ProductRow> = sqlx::query_as(&format!(
      "SELECT {} FROM products ORDER BY item_id DESC",
      PRODUCT_COLUMNS
    ))
    .fetch_all(&self.pool)
    .await
    .map_err(db_error("list"))?;
    Ok(into_stored(rows))
  }

  #[instrument(name = "db::fetch_product", skip(self))]
  async fn fetch(&self, id: ProductId) -> CatalogResult<Option<StoredProduct>> {
    let row: Option<ProductRow> = sqlx::query_as(&format!("SELECT {} FROM products WHERE item_id = $1", PRODUCT_COLUMNS))
      .bind(id)
      .fetch_optional(&self.pool)
      .await
      .map_err(db_error("fetch"))?;
    Ok(row.map(StoredProduct::from))
  }

  #[instrument(name = "db::search_products", skip(self))]
  async fn search_by_name(&self, fragment: &str) -> CatalogResult<Vec<StoredProduct>> {
    let rows: Vec<ProductRow> = sqlx::query_as(&format!(
      "SELECT {} FROM products WHERE item_name ILIKE $1 ORDER BY item_id DESC",
      PRODUCT_COLUMNS
    ))
    .bind(like_pattern(fragment))
    .fetch_all(&self.pool)
    .await
    .map_err(db_error("search"))?;
    Ok(into_stored(rows))
  }

  #[instrument(name = "db::filter_by_category", skip(self))]
  async fn filter_by_category(&self, label: &str) -> CatalogResult<Vec<StoredProduct>> {
    let rows: Vec<ProductRow> = sqlx::query_as(&format!(
      "SELECT {} FROM products \
       WHERE EXISTS (SELECT 1 FROM unnest(categories) AS c WHERE lower(c) = lower($1)) \
       ORDER BY item_id DESC",
      PRODUCT_COLUMNS
    ))
    .bind(label)
    .fetch_all(&self.pool)
    .await
    .map_err(db_error("filter_by_category"))?;
    Ok(into_stored(rows))
  }

  #[instrument(name = "db::insert_product", skip_all)]
  async fn insert(&self, row: NewStoredProduct) -> CatalogResult<ProductId> {
    sqlx::query_scalar::<_, i32>(
      "INSERT INTO products (item_name, item_desc, item_price, seller, image_url, categories) \
       VALUES ($1, $2, $3, $4, $5::jsonb, $6::text[]) RETURNING item_id",
    )
    .bind(row.name)
    .bind(row.description)
    .bind(row.price)
    .bind(row.seller)
    .bind(row.images)
    .bind(row.categories)
    .fetch_one(&self.pool)
    .await
    .map_err(db_error("insert"))
  }

  #[instrument(name = "db::update_product", skip(self, row))]
  async fn update(&self, id: ProductId, row: StoredUpdate) -> CatalogResult<Option<StoredProduct>> {
    let updated: Option<ProductRow> = sqlx::query_as(&format!(
      "UPDATE products \
       SET item_name = $2, item_desc = $3, item_price = $4, seller = $5, categories = $6::text[] \
       WHERE item_id = $1 RETURNING {}",
      PRODUCT_COLUMNS
    ))
    .bind(id)
    .bind(row.name)
    .bind(row.description)
    .bind(row.price)
    .bind(row.seller)
    .bind(row.categories)
    .fetch_optional(&self.pool)
    .await
    .map_err(db_error("update"))?;
    Ok(updated.map(StoredProduct::from))
  }

  #[instrument(name = "db::delete_product", skip(self))]
  async fn delete(&self, id: ProductId) -> CatalogResult<u64> {
    let result = sqlx::query("DELETE FROM products WHERE item_id = $1")
      .bind(id)
      .execute(&self.pool)
      .await
      .map_err(db_error("delete"))?;
    Ok(result.rows_affected())
  }
}
