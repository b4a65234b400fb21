// tests/service_tests.rs
mod common;

use catalog_core::model::StoredProduct;
use catalog_core::service::{parse_price, validate_listing};
use catalog_core::{Attachment, CatalogError, ListingForm, ProductUpdate};
use common::*;
use serial_test::serial;

fn mug_form() -> ListingForm {
  ListingForm {
    item_name: Some("Mug".to_string()),
    item_desc: Some("Ceramic mug".to_string()),
    item_price: Some("9.99".to_string()),
    item_seller: Some("acme".to_string()),
    categories: Some(r#"["kitchen","ceramics"]"#.to_string()),
  }
}

fn named(name: &str) -> ListingForm {
  ListingForm {
    item_name: Some(name.to_string()),
    item_desc: Some(format!("A {}", name)),
    item_price: Some("5".to_string()),
    ..Default::default()
  }
}

fn photo() -> Vec<Attachment> {
  vec![Attachment::from_bytes("mug.png", Some("image/png".to_string()), &b"png"[..])]
}

fn update_for(id: i32) -> ProductUpdate {
  ProductUpdate {
    id,
    name: "Big Mug".to_string(),
    description: "Bigger".to_string(),
    price: 12.5,
    seller: "acme".to_string(),
    categories: vec!["Kitchen".to_string()],
  }
}

#[tokio::test]
#[serial]
async fn test_create_echoes_fields_and_one_locator() {
  setup_tracing();
  let fx = fixture();

  let product = fx.service.create(mug_form(), photo()).await.unwrap();

  assert!(product.id > 0);
  assert_eq!(product.name, "Mug");
  assert_eq!(product.description, "Ceramic mug");
  assert_eq!(product.price, 9.99);
  assert_eq!(product.seller, "acme");
  assert_eq!(product.categories, vec!["kitchen", "ceramics"]);
  assert_eq!(product.images.len(), 1);
  assert!(product.images[0].ends_with("-0-mug.png"), "got {}", product.images[0]);

  let fetched = fx.service.get(product.id).await.unwrap();
  assert_eq!(fetched, product);
}

#[tokio::test]
#[serial]
async fn test_create_without_files_writes_nothing() {
  setup_tracing();
  reset_counters();
  let fx = fixture();

  match fx.service.create(mug_form(), Vec::new()).await {
    Err(CatalogError::Validation(msg)) => assert_eq!(msg, "No files uploaded"),
    other => panic!("Expected Validation error, got {:?}", other),
  }
  assert!(fx.store.is_empty());
  assert_eq!(puts(), 0);
}

#[tokio::test]
#[serial]
async fn test_invalid_form_is_rejected_before_any_upload() {
  setup_tracing();
  reset_counters();
  let fx = fixture();

  let cases = [
    (ListingForm { item_price: Some("abc".to_string()), ..mug_form() }, "Invalid item price"),
    (ListingForm { item_price: Some("-1".to_string()), ..mug_form() }, "Invalid item price"),
    (ListingForm { item_price: None, ..mug_form() }, "Invalid item price"),
    (ListingForm { item_name: Some("  ".to_string()), ..mug_form() }, "Item name is required"),
    (ListingForm { item_desc: None, ..mug_form() }, "Item description is required"),
  ];
  for (form, expected) in cases {
    match fx.service.create(form, photo()).await {
      Err(CatalogError::Validation(msg)) => assert_eq!(msg, expected),
      other => panic!("Expected Validation error '{}', got {:?}", expected, other),
    }
  }

  let bad_categories = ListingForm {
    categories: Some("kitchen".to_string()),
    ..mug_form()
  };
  match fx.service.create(bad_categories, photo()).await {
    Err(CatalogError::Validation(msg)) => assert!(msg.starts_with("Invalid categories format:"), "got {}", msg),
    other => panic!("Expected Validation error, got {:?}", other),
  }

  assert!(fx.store.is_empty());
  assert_eq!(puts(), 0);
}

#[tokio::test]
#[serial]
async fn test_missing_optional_fields_default_to_empty() {
  setup_tracing();
  let fx = fixture();
  let form = ListingForm {
    item_seller: None,
    categories: None,
    ..mug_form()
  };

  let product = fx.service.create(form, photo()).await.unwrap();
  assert_eq!(product.seller, "");
  assert!(product.categories.is_empty());
}

#[test]
fn test_price_parsing() {
  assert_eq!(parse_price("9.99").unwrap(), 9.99);
  assert_eq!(parse_price(" 0 ").unwrap(), 0.0);
  assert!(parse_price("NaN").is_err());
  assert!(parse_price("inf").is_err());
  assert!(parse_price("").is_err());
}

#[test]
fn test_validate_listing_leaves_images_empty() {
  let draft = validate_listing(&mug_form()).unwrap();
  assert!(draft.images.is_empty());
  assert_eq!(draft.categories, vec!["kitchen", "ceramics"]);
}

#[tokio::test]
#[serial]
async fn test_get_missing_product_is_not_found() {
  setup_tracing();
  let fx = fixture();

  match fx.service.get(999).await {
    Err(CatalogError::NotFound(msg)) => assert_eq!(msg, "Product not found"),
    other => panic!("Expected NotFound, got {:?}", other),
  }
}

#[tokio::test]
#[serial]
async fn test_list_is_newest_first() {
  setup_tracing();
  let fx = fixture();
  for name in ["first", "second", "third"] {
    fx.service.create(named(name), photo()).await.unwrap();
  }

  let names: Vec<String> = fx.service.list().await.unwrap().into_iter().map(|p| p.name).collect();
  assert_eq!(names, vec!["third", "second", "first"]);
}

#[tokio::test]
#[serial]
async fn test_search_matches_name_fragment_ignoring_case() {
  setup_tracing();
  let fx = fixture();
  for name in ["Ceramic Mug", "Lamp", "Steel Mug"] {
    fx.service.create(named(name), photo()).await.unwrap();
  }

  let mut names: Vec<String> = fx.service.search(Some("mug")).await.unwrap().into_iter().map(|p| p.name).collect();
  names.sort();
  assert_eq!(names, vec!["Ceramic Mug", "Steel Mug"]);

  assert_eq!(fx.service.search(Some("")).await.unwrap().len(), 3);
  match fx.service.search(None).await {
    Err(CatalogError::Validation(msg)) => assert_eq!(msg, "Search term is required"),
    other => panic!("Expected Validation error, got {:?}", other),
  }
}

#[tokio::test]
#[serial]
async fn test_category_filter_is_exact_and_case_insensitive() {
  setup_tracing();
  let fx = fixture();
  fx.service.create(mug_form(), photo()).await.unwrap();
  let lamp = ListingForm {
    categories: Some(r#"["Lighting","home decor"]"#.to_string()),
    ..named("Lamp")
  };
  fx.service.create(lamp, photo()).await.unwrap();

  let kitchen = fx.service.by_category("KITCHEN").await.unwrap();
  assert_eq!(kitchen.len(), 1);
  assert_eq!(kitchen[0].name, "Mug");

  let decor = fx.service.by_category("Home Decor").await.unwrap();
  assert_eq!(decor.len(), 1);
  assert_eq!(decor[0].categories, vec!["Lighting", "home decor"]);

  assert!(fx.service.by_category("kitch").await.unwrap().is_empty());
  match fx.service.by_category(" ").await {
    Err(CatalogError::Validation(msg)) => assert_eq!(msg, "Category is required"),
    other => panic!("Expected Validation error, got {:?}", other),
  }
}

#[tokio::test]
#[serial]
async fn test_update_replaces_fields_but_keeps_images() {
  setup_tracing();
  let fx = fixture();
  let created = fx.service.create(mug_form(), photo()).await.unwrap();

  let updated = fx.service.update(update_for(created.id)).await.unwrap();

  assert_eq!(updated.id, created.id);
  assert_eq!(updated.name, "Big Mug");
  assert_eq!(updated.price, 12.5);
  assert_eq!(updated.categories, vec!["Kitchen"]);
  assert_eq!(updated.images, created.images);
  assert_eq!(fx.service.get(created.id).await.unwrap(), updated);
}

#[tokio::test]
#[serial]
async fn test_update_of_missing_id_creates_nothing() {
  setup_tracing();
  let fx = fixture();
  fx.service.create(mug_form(), photo()).await.unwrap();

  match fx.service.update(update_for(999)).await {
    Err(CatalogError::NotFound(msg)) => assert_eq!(msg, "Item not found"),
    other => panic!("Expected NotFound, got {:?}", other),
  }
  assert_eq!(fx.store.len(), 1);
}

#[tokio::test]
#[serial]
async fn test_update_validates_name_and_price() {
  setup_tracing();
  let fx = fixture();
  let created = fx.service.create(mug_form(), photo()).await.unwrap();

  let negative = ProductUpdate {
    price: -3.0,
    ..update_for(created.id)
  };
  assert!(matches!(fx.service.update(negative).await, Err(CatalogError::Validation(_))));

  let nameless = ProductUpdate {
    name: String::new(),
    ..update_for(created.id)
  };
  assert!(matches!(fx.service.update(nameless).await, Err(CatalogError::Validation(_))));
  assert_eq!(fx.service.get(created.id).await.unwrap(), created);
}

#[tokio::test]
#[serial]
async fn test_delete_removes_row_once() {
  setup_tracing();
  let fx = fixture();
  let created = fx.service.create(mug_form(), photo()).await.unwrap();

  fx.service.delete(created.id).await.unwrap();
  assert!(fx.store.is_empty());

  match fx.service.delete(created.id).await {
    Err(CatalogError::NotFound(msg)) => assert_eq!(msg, "Item not found"),
    other => panic!("Expected NotFound, got {:?}", other),
  }
}

#[tokio::test]
#[serial]
async fn test_delete_of_missing_id_leaves_store_unchanged() {
  setup_tracing();
  let fx = fixture();
  fx.service.create(mug_form(), photo()).await.unwrap();

  assert!(matches!(fx.service.delete(42).await, Err(CatalogError::NotFound(_))));
  assert_eq!(fx.store.len(), 1);
}

#[tokio::test]
#[serial]
async fn test_one_corrupt_row_fails_the_whole_listing() {
  setup_tracing();
  let fx = fixture();
  fx.service.create(mug_form(), photo()).await.unwrap();
  fx.store.insert_raw(StoredProduct {
    id: 50,
    name: "Broken".to_string(),
    description: String::new(),
    price: 1.0,
    seller: String::new(),
    images: "not json".to_string(),
    categories: "{}".to_string(),
  });

  match fx.service.list().await {
    Err(CatalogError::Decode { field, .. }) => assert_eq!(field, "image_url"),
    other => panic!("Expected Decode error, got {:?}", other),
  }
  assert!(matches!(fx.service.get(50).await, Err(CatalogError::Decode { .. })));
}

#[tokio::test]
#[serial]
async fn test_uploaded_objects_land_in_the_object_store() {
  setup_tracing();
  let fx = fixture();
  let product = fx.service.create(mug_form(), photo()).await.unwrap();

  let key = product.images[0].trim_start_matches("memory://");
  assert_eq!(fx.objects.inner.object(key).unwrap().as_ref(), b"png");
}
