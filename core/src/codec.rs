// catalog_core/src/codec.rs

//! Attribute codec: translates the collection-valued product attributes between
//! their in-memory form and the textual form persisted in the catalog store.
//!
//! * `images` are stored as a JSON array of strings (`["https://..", ..]`).
//! * `categories` are stored as a Postgres `TEXT[]`, read back through its
//!   textual representation (`{kitchen,"home decor"}`).
//!
//! Category decoding is a plain split on `,` after stripping the braces. A
//! label that itself contains a comma or a brace does not survive a round trip;
//! existing rows were written and read that way, so the split stays.

use crate::error::{CatalogError, CatalogResult};

/// Textual sentinel for an image set with no entries.
pub const EMPTY_IMAGES: &str = "[]";
/// Textual sentinel for a category set with no entries.
pub const EMPTY_CATEGORIES: &str = "{}";

pub fn encode_images(images: &[String]) -> CatalogResult<String> {
  serde_json::to_string(images).map_err(|e| CatalogError::Internal(format!("Failed to marshal image URLs: {}", e)))
}

pub fn decode_images(stored: &str) -> CatalogResult<Vec<String>> {
  let trimmed = stored.trim();
  if trimmed.is_empty() {
    return Ok(Vec::new());
  }
  serde_json::from_str::<Vec<String>>(trimmed).map_err(|e| CatalogError::Decode {
    field: "image_url",
    message: e.to_string(),
  })
}

/// Encodes labels as a Postgres array literal, accepted by `$n::text[]`.
///
/// Elements are quoted exactly when Postgres would quote them on output, so an
/// encoded value looks like what `categories::text` hands back.
pub fn encode_categories(categories: &[String]) -> String {
  let elements: Vec<String> = categories.iter().map(|label| quote_element(label)).collect();
  format!("{{{}}}", elements.join(","))
}

pub fn decode_categories(stored: &str) -> CatalogResult<Vec<String>> {
  let trimmed = stored.trim();
  if trimmed.is_empty() {
    return Ok(Vec::new());
  }
  if !(trimmed.starts_with('{') && trimmed.ends_with('}')) {
    return Err(CatalogError::Decode {
      field: "categories",
      message: format!("expected a brace-delimited array, got {:?}", trimmed),
    });
  }

  let inner = trimmed.trim_matches(|c| c == '{' || c == '}');
  if inner.trim().is_empty() {
    return Ok(Vec::new());
  }
  Ok(inner.split(',').map(|element| unquote_element(element.trim())).collect())
}

/// Parses the `categories` field of a create request: a JSON array of strings.
/// A blank field means "no categories".
pub fn parse_category_input(raw: &str) -> CatalogResult<Vec<String>> {
  if raw.trim().is_empty() {
    return Ok(Vec::new());
  }
  serde_json::from_str::<Vec<String>>(raw).map_err(|e| CatalogError::validation(format!("Invalid categories format: {}", e)))
}

/// Case-insensitive set membership, the match rule of the category filter.
pub fn categories_match(categories: &[String], label: &str) -> bool {
  let wanted = label.to_lowercase();
  categories.iter().any(|c| c.to_lowercase() == wanted)
}

fn needs_quotes(label: &str) -> bool {
  label.is_empty()
    || label.eq_ignore_ascii_case("NULL")
    || label
      .chars()
      .any(|c| c.is_whitespace() || matches!(c, '{' | '}' | ',' | '"' | '\\'))
}

fn quote_element(label: &str) -> String {
  if !needs_quotes(label) {
    return label.to_string();
  }
  let mut quoted = String::with_capacity(label.len() + 2);
  quoted.push('"');
  for c in label.chars() {
    if c == '"' || c == '\\' {
      quoted.push('\\');
    }
    quoted.push(c);
  }
  quoted.push('"');
  quoted
}

fn unquote_element(element: &str) -> String {
  let Some(body) = element
    .strip_prefix('"')
    .and_then(|rest| rest.strip_suffix('"'))
  else {
    return element.to_string();
  };

  let mut label = String::with_capacity(body.len());
  let mut chars = body.chars();
  while let Some(c) = chars.next() {
    if c == '\\' {
      if let Some(escaped) = chars.next() {
        label.push(escaped);
      }
    } else {
      label.push(c);
    }
  }
  label
}
