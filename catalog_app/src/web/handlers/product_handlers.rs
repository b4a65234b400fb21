// catalog_app/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use catalog_core::{ProductId, ProductUpdate};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Deserialize, Debug)]
pub struct SearchQuery {
  pub name: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct DeleteQuery {
  pub id: Option<String>,
}

fn parse_id(raw: &str, message: &'static str) -> Result<ProductId, AppError> {
  raw.trim().parse::<ProductId>().map_err(|_| AppError::bad_request(message))
}

#[instrument(name = "handler::list_products", skip(app_state))]
pub async fn list_products_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let products = app_state.catalog.list().await?;
  info!("Successfully fetched {} products.", products.len());
  Ok(HttpResponse::Ok().json(products))
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(product_id = %path.as_str()))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let product_id = parse_id(&path, "Invalid product ID")?;
  let product = app_state.catalog.get(product_id).await?;
  Ok(HttpResponse::Ok().json(product))
}

#[instrument(name = "handler::search_products", skip(app_state, path), fields(fragment = %path.as_str()))]
pub async fn search_products_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let products = app_state.catalog.search(Some(path.as_str())).await?;
  info!("Search matched {} products.", products.len());
  Ok(HttpResponse::Ok().json(products))
}

/// `GET /search/product?name=...`; an absent `name` is rejected, an empty one lists everything.
#[instrument(name = "handler::search_products_query", skip(app_state))]
pub async fn search_products_query_handler(
  app_state: web::Data<AppState>,
  query: web::Query<SearchQuery>,
) -> Result<HttpResponse, AppError> {
  let products = app_state.catalog.search(query.name.as_deref()).await?;
  info!("Search matched {} products.", products.len());
  Ok(HttpResponse::Ok().json(products))
}

#[instrument(name = "handler::products_by_category", skip(app_state, path), fields(category = %path.as_str()))]
pub async fn products_by_category_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let products = app_state.catalog.by_category(&path).await?;
  Ok(HttpResponse::Ok().json(products))
}

#[instrument(name = "handler::update_product", skip(app_state, body), fields(product_id = body.id))]
pub async fn update_product_handler(
  app_state: web::Data<AppState>,
  body: web::Json<ProductUpdate>,
) -> Result<HttpResponse, AppError> {
  let product = app_state.catalog.update(body.into_inner()).await?;
  Ok(HttpResponse::Ok().json(product))
}

#[instrument(name = "handler::delete_product", skip(app_state))]
pub async fn delete_product_handler(
  app_state: web::Data<AppState>,
  query: web::Query<DeleteQuery>,
) -> Result<HttpResponse, AppError> {
  let product_id = parse_id(query.id.as_deref().unwrap_or_default(), "Invalid item ID")?;
  app_state.catalog.delete(product_id).await?;
  Ok(HttpResponse::Ok().json(json!({
      "message": "Item deleted",
      "Item_id": product_id
  })))
}
