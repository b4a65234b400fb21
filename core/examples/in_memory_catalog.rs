// examples/in_memory_catalog.rs
//! Drives the catalog service end to end against the in-memory stores.
//! Run with `RUST_LOG=debug cargo run --example in_memory_catalog` to see the pipeline spans.

use catalog_core::memory::{MemoryCatalogStore, MemoryObjectStore};
use catalog_core::{Attachment, CatalogError, CatalogService, ListingForm, ProductUpdate};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), CatalogError> {
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .init();

  let store = Arc::new(MemoryCatalogStore::new());
  let objects = Arc::new(MemoryObjectStore::new());
  let catalog = CatalogService::new(store.clone(), objects.clone());

  let form = ListingForm {
    item_name: Some("Ceramic Mug".to_string()),
    item_desc: Some("Hand-thrown, 350ml".to_string()),
    item_price: Some("9.99".to_string()),
    item_seller: Some("acme".to_string()),
    categories: Some(r#"["kitchen","ceramics"]"#.to_string()),
  };
  let photos = vec![
    Attachment::from_bytes("front.png", Some("image/png".to_string()), &b"front"[..]),
    Attachment::from_bytes("side.png", Some("image/png".to_string()), &b"side"[..]),
  ];
  let mug = catalog.create(form, photos).await?;
  println!("Created: {:?}", mug);
  println!("Objects stored: {:?}", objects.keys());

  let found = catalog.search(Some("mug")).await?;
  println!("Search 'mug' -> {} result(s)", found.len());

  let updated = catalog
    .update(ProductUpdate {
      id: mug.id,
      name: "Ceramic Mug (large)".to_string(),
      description: mug.description.clone(),
      price: 12.5,
      seller: mug.seller.clone(),
      categories: vec!["kitchen".to_string(), "gifts".to_string()],
    })
    .await?;
  println!("Updated: {:?}", updated);

  match catalog.get(999).await {
    Err(e) => println!("Fetching 999 fails as expected: {}", e),
    Ok(product) => println!("Unexpectedly found {:?}", product),
  }

  catalog.delete(mug.id).await?;
  println!("Rows left: {}", store.len());
  Ok(())
}
