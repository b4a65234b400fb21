// catalog_core/src/model.rs

//! Product shapes: the persisted entity, its pre-creation and update forms,
//! and the stored-form rows the `CatalogStore` exchanges.

use serde::{Deserialize, Serialize};

/// Store-assigned product identifier (`SERIAL` in Postgres).
pub type ProductId = i32;

/// A persisted product listing. This is the only shape ever serialized in a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
  #[serde(rename = "Item_id")]
  pub id: ProductId,
  #[serde(rename = "Item_name")]
  pub name: String,
  #[serde(rename = "Item_desc")]
  pub description: String,
  #[serde(rename = "Item_price")]
  pub price: f64,
  #[serde(rename = "Item_seller")]
  pub seller: String,
  #[serde(rename = "image_url")]
  pub images: Vec<String>,
  pub categories: Vec<String>,
}

/// A validated product awaiting creation. `images` holds locators produced by ingestion.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
  pub name: String,
  pub description: String,
  pub price: f64,
  pub seller: String,
  pub images: Vec<String>,
  pub categories: Vec<String>,
}

impl NewProduct {
  pub fn into_product(self, id: ProductId) -> Product {
    Product {
      id,
      name: self.name,
      description: self.description,
      price: self.price,
      seller: self.seller,
      images: self.images,
      categories: self.categories,
    }
  }
}

/// Raw text fields of a create request, exactly as they arrived.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListingForm {
  pub item_name: Option<String>,
  pub item_desc: Option<String>,
  pub item_price: Option<String>,
  pub item_seller: Option<String>,
  /// JSON array of labels, e.g. `["kitchen","ceramics"]`.
  pub categories: Option<String>,
}

impl ListingForm {
  /// The slot a named form field fills, or `None` for names the form doesn't carry.
  pub fn field_mut(&mut self, name: &str) -> Option<&mut Option<String>> {
    match name {
      "item_name" => Some(&mut self.item_name),
      "item_desc" => Some(&mut self.item_desc),
      "item_price" => Some(&mut self.item_price),
      "item_seller" => Some(&mut self.item_seller),
      "categories" | "category" => Some(&mut self.categories),
      _ => None,
    }
  }
}

/// Full replacement of the mutable fields. `images` are deliberately absent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductUpdate {
  #[serde(rename = "item_id")]
  pub id: ProductId,
  #[serde(rename = "item_name")]
  pub name: String,
  #[serde(rename = "item_desc")]
  pub description: String,
  #[serde(rename = "item_price")]
  pub price: f64,
  #[serde(rename = "item_seller", default)]
  pub seller: String,
  #[serde(default)]
  pub categories: Vec<String>,
}

/// A product row with `images` / `categories` still in their stored textual forms.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredProduct {
  pub id: ProductId,
  pub name: String,
  pub description: String,
  pub price: f64,
  pub seller: String,
  pub images: String,
  pub categories: String,
}

/// Insert payload: a `NewProduct` after attribute encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStoredProduct {
  pub name: String,
  pub description: String,
  pub price: f64,
  pub seller: String,
  pub images: String,
  pub categories: String,
}

/// Update payload: a `ProductUpdate` after attribute encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredUpdate {
  pub name: String,
  pub description: String,
  pub price: f64,
  pub seller: String,
  pub categories: String,
}
