// catalog_core/src/service.rs

//! Request-level catalog operations. Every read path decodes stored attributes
//! through the codec; every write path encodes them before the store sees the row.

use crate::codec;
use crate::error::{CatalogError, CatalogResult};
use crate::ingest::{Attachment, IngestionPipeline};
use crate::model::{
  ListingForm, NewProduct, NewStoredProduct, Product, ProductId, ProductUpdate, StoredProduct, StoredUpdate,
};
use crate::object_store::ObjectStore;
use crate::pipeline::{ContextData, Pipeline, PipelineControl, PipelineResult};
use crate::store::CatalogStore;
use std::sync::Arc;
use tracing::{info, instrument, warn};

pub const PRODUCT_NOT_FOUND: &str = "Product not found";
pub const ITEM_NOT_FOUND: &str = "Item not found";

#[derive(Debug, Default)]
struct CreateCtxData {
  form: ListingForm,
  attachments: Vec<Attachment>,
  draft: Option<NewProduct>,
  created: Option<Product>,
}

pub struct CatalogService {
  store: Arc<dyn CatalogStore>,
  create_flow: Pipeline<CreateCtxData, CatalogError>,
}

impl CatalogService {
  pub fn new(store: Arc<dyn CatalogStore>, object_store: Arc<dyn ObjectStore>) -> Self {
    let ingestion = IngestionPipeline::new(object_store);
    let create_flow = build_create_flow(store.clone(), ingestion);
    Self { store, create_flow }
  }

  #[instrument(name = "catalog::list", skip(self))]
  pub async fn list(&self) -> CatalogResult<Vec<Product>> {
    let rows = self.store.list().await?;
    materialize_all(rows)
  }

  #[instrument(name = "catalog::get", skip(self))]
  pub async fn get(&self, id: ProductId) -> CatalogResult<Product> {
    match self.store.fetch(id).await? {
      Some(row) => materialize(row),
      None => Err(CatalogError::not_found(PRODUCT_NOT_FOUND)),
    }
  }

  /// Case-insensitive substring match on the name. `Some("")` matches every row;
  /// `None` means the caller never supplied a search term.
  #[instrument(name = "catalog::search", skip(self))]
  pub async fn search(&self, fragment: Option<&str>) -> CatalogResult<Vec<Product>> {
    let fragment = fragment.ok_or_else(|| CatalogError::validation("Search term is required"))?;
    let rows = self.store.search_by_name(fragment).await?;
    materialize_all(rows)
  }

  #[instrument(name = "catalog::by_category", skip(self))]
  pub async fn by_category(&self, label: &str) -> CatalogResult<Vec<Product>> {
    let label = label.trim();
    if label.is_empty() {
      return Err(CatalogError::validation("Category is required"));
    }
    let rows = self.store.filter_by_category(label).await?;
    materialize_all(rows)
  }

  /// Validates the form, ingests the attachments, then writes the row.
  /// Nothing is uploaded for a form that fails validation.
  #[instrument(name = "catalog::create", skip_all, fields(attachments = attachments.len()))]
  pub async fn create(&self, form: ListingForm, attachments: Vec<Attachment>) -> CatalogResult<Product> {
    let ctx_data = ContextData::new(CreateCtxData {
      form,
      attachments,
      ..Default::default()
    });

    match self.create_flow.run(ctx_data.clone()).await? {
      PipelineResult::Completed => ctx_data
        .take(|d| &mut d.created)
        .ok_or_else(|| CatalogError::Internal("Create flow completed without a product".to_string())),
      PipelineResult::Stopped => Err(CatalogError::Internal("Create flow was halted".to_string())),
    }
  }

  /// Replaces name, description, price, seller and categories. Images stay as they are.
  #[instrument(name = "catalog::update", skip_all, fields(product_id = update.id))]
  pub async fn update(&self, update: ProductUpdate) -> CatalogResult<Product> {
    require_name(&update.name)?;
    require_price(update.price)?;

    let row = StoredUpdate {
      name: update.name,
      description: update.description,
      price: update.price,
      seller: update.seller,
      categories: codec::encode_categories(&update.categories),
    };
    match self.store.update(update.id, row).await? {
      Some(updated) => {
        info!("Product updated.");
        materialize(updated)
      }
      None => {
        warn!("Update matched no product.");
        Err(CatalogError::not_found(ITEM_NOT_FOUND))
      }
    }
  }

  #[instrument(name = "catalog::delete", skip(self))]
  pub async fn delete(&self, id: ProductId) -> CatalogResult<()> {
    match self.store.delete(id).await? {
      0 => Err(CatalogError::not_found(ITEM_NOT_FOUND)),
      _ => {
        info!("Product deleted.");
        Ok(())
      }
    }
  }
}

impl std::fmt::Debug for CatalogService {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("CatalogService")
      .field("create_flow", &self.create_flow)
      .finish_non_exhaustive()
  }
}

fn build_create_flow(store: Arc<dyn CatalogStore>, ingestion: IngestionPipeline) -> Pipeline<CreateCtxData, CatalogError> {
  let mut flow = Pipeline::<CreateCtxData, CatalogError>::new(
    "create_listing",
    &[
      ("validate_listing", false),
      ("ingest_images", false),
      ("persist_listing", false),
    ],
  );

  flow.on_root("validate_listing", |ctx_data: ContextData<CreateCtxData>| async move {
    let draft = validate_listing(&ctx_data.read().form)?;
    ctx_data.write().draft = Some(draft);
    Ok::<_, CatalogError>(PipelineControl::Continue)
  });

  flow.on_root("ingest_images", move |ctx_data: ContextData<CreateCtxData>| {
    let ingestion = ingestion.clone();
    async move {
      let attachments = ctx_data.take(|d| &mut d.attachments);
      let locators = ingestion.ingest(attachments).await?;
      match ctx_data.write().draft.as_mut() {
        Some(draft) => draft.images = locators,
        None => return Err(CatalogError::Internal("No validated listing to attach images to".to_string())),
      }
      Ok::<_, CatalogError>(PipelineControl::Continue)
    }
  });

  flow.on_root("persist_listing", move |ctx_data: ContextData<CreateCtxData>| {
    let store = store.clone();
    async move {
      let draft = ctx_data
        .take(|d| &mut d.draft)
        .ok_or_else(|| CatalogError::Internal("No validated listing to persist".to_string()))?;
      let row = NewStoredProduct {
        name: draft.name.clone(),
        description: draft.description.clone(),
        price: draft.price,
        seller: draft.seller.clone(),
        images: codec::encode_images(&draft.images)?,
        categories: codec::encode_categories(&draft.categories),
      };
      let id = store.insert(row).await?;
      ctx_data.write().created = Some(draft.into_product(id));
      Ok::<_, CatalogError>(PipelineControl::Continue)
    }
  });

  flow.after_root("persist_listing", |ctx_data: ContextData<CreateCtxData>| async move {
    match ctx_data.read().created.as_ref() {
      Some(product) => info!(product_id = product.id, images = product.images.len(), "Product created."),
      None => return Err(CatalogError::Internal("Listing was not persisted".to_string())),
    }
    Ok::<_, CatalogError>(PipelineControl::Continue)
  });

  flow
}

/// Checks the raw create form and turns it into a `NewProduct` with no images yet.
pub fn validate_listing(form: &ListingForm) -> CatalogResult<NewProduct> {
  let name = form.item_name.clone().unwrap_or_default();
  require_name(&name)?;
  let description = form
    .item_desc
    .clone()
    .ok_or_else(|| CatalogError::validation("Item description is required"))?;
  let price = parse_price(form.item_price.as_deref().unwrap_or_default())?;
  let categories = codec::parse_category_input(form.categories.as_deref().unwrap_or_default())?;

  Ok(NewProduct {
    name,
    description,
    price,
    seller: form.item_seller.clone().unwrap_or_default(),
    images: Vec::new(),
    categories,
  })
}

/// Parses a decimal price. Rejects anything non-numeric, non-finite or negative.
pub fn parse_price(raw: &str) -> CatalogResult<f64> {
  let price = raw
    .trim()
    .parse::<f64>()
    .map_err(|_| CatalogError::validation("Invalid item price"))?;
  require_price(price)?;
  Ok(price)
}

fn require_price(price: f64) -> CatalogResult<()> {
  if price.is_finite() && price >= 0.0 {
    Ok(())
  } else {
    Err(CatalogError::validation("Invalid item price"))
  }
}

fn require_name(name: &str) -> CatalogResult<()> {
  if name.trim().is_empty() {
    return Err(CatalogError::validation("Item name is required"));
  }
  Ok(())
}

fn materialize(row: StoredProduct) -> CatalogResult<Product> {
  Ok(Product {
    images: codec::decode_images(&row.images)?,
    categories: codec::decode_categories(&row.categories)?,
    id: row.id,
    name: row.name,
    description: row.description,
    price: row.price,
    seller: row.seller,
  })
}

// Fail-fast: one undecodable row fails the whole listing.
fn materialize_all(rows: Vec<StoredProduct>) -> CatalogResult<Vec<Product>> {
  rows.into_iter().map(materialize).collect()
}
