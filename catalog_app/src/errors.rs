// catalog_app/src/errors.rs

use actix_web::http::{header::ContentType, StatusCode};
use actix_web::{HttpResponse, ResponseError};
use catalog_core::CatalogError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  /// Anything the catalog itself reports; the variant decides the status.
  #[error(transparent)]
  Catalog(#[from] CatalogError),

  /// Request shape problems caught before the catalog is reached (bad ids,
  /// unreadable multipart bodies, oversize files).
  #[error("{0}")]
  BadRequest(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),
}

impl AppError {
  pub fn bad_request(message: impl Into<String>) -> Self {
    AppError::BadRequest(message.into())
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Catalog(CatalogError::Validation(_)) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
      AppError::Catalog(CatalogError::NotFound(_)) => StatusCode::NOT_FOUND,
      AppError::Catalog(_) | AppError::Config(_) | AppError::Sqlx(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  // Plain-text bodies; 5xx responses carry the underlying message.
  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!(application_error = %self, status = status.as_u16(), "Responding with error");
    } else {
      tracing::warn!(application_error = %self, status = status.as_u16(), "Rejecting request");
    }
    HttpResponse::build(status)
      .insert_header(ContentType::plaintext())
      .body(self.to_string())
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
