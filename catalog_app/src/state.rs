// catalog_app/src/state.rs
use crate::config::AppConfig;
use catalog_core::CatalogService;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct AppState {
  pub catalog: Arc<CatalogService>,
  /// Per-file cap applied while multipart bodies are streamed in.
  pub max_upload_bytes: usize,
}

impl AppState {
  pub fn new(catalog: Arc<CatalogService>, config: &AppConfig) -> Self {
    Self {
      catalog,
      max_upload_bytes: config.max_upload_bytes,
    }
  }
}
