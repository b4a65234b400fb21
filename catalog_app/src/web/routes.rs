// catalog_app/src/web/routes.rs

use actix_web::{web, HttpResponse};

use crate::errors::AppError;
use crate::web::handlers::{product_handlers, upload_handlers};

// Liveness only; it does not touch Postgres or S3.
async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// Malformed JSON bodies get the same plain-text 400 as every other client error.
fn json_config() -> web::JsonConfig {
  web::JsonConfig::default().error_handler(|err, _req| AppError::bad_request(err.to_string()).into())
}

fn query_config() -> web::QueryConfig {
  web::QueryConfig::default().error_handler(|err, _req| AppError::bad_request(err.to_string()).into())
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .app_data(json_config())
    .app_data(query_config())
    .route("/health", web::get().to(health_check_handler))
    .service(
      web::resource("/")
        .route(web::get().to(product_handlers::list_products_handler))
        .route(web::post().to(upload_handlers::create_product_handler)),
    )
    .route("/upload", web::post().to(upload_handlers::create_product_handler))
    .route("/product/{product_id}", web::get().to(product_handlers::get_product_handler))
    .route("/search/product", web::get().to(product_handlers::search_products_query_handler))
    .route("/search/product/{name}", web::get().to(product_handlers::search_products_handler))
    .route("/category/{category}", web::get().to(product_handlers::products_by_category_handler))
    .route("/update", web::put().to(product_handlers::update_product_handler))
    .route("/delete", web::delete().to(product_handlers::delete_product_handler));
}
