// catalog_app/src/models/product.rs

use catalog_core::StoredProduct;
use sqlx::FromRow;

/// One `products` row with the collection columns cast to text.
#[derive(Debug, Clone, FromRow)]
pub struct ProductRow {
  pub item_id: i32,
  pub item_name: String,
  pub item_desc: String,
  pub item_price: f64,
  pub seller: String,
  pub image_url: String,
  pub categories: String,
}

impl From<ProductRow> for StoredProduct {
  fn from(row: ProductRow) -> Self {
    StoredProduct {
      id: row.item_id,
      name: row.item_name,
      description: row.item_desc,
      price: row.item_price,
      seller: row.seller,
      images: row.image_url,
      categories: row.categories,
    }
  }
}
