// catalog_app/src/web/handlers/upload_handlers.rs

use actix_multipart::{Field, Multipart};
use actix_web::{web, HttpResponse};
use bytes::BytesMut;
use catalog_core::{Attachment, ListingForm};
use futures_util::TryStreamExt;
use tracing::{debug, info, instrument};

use crate::errors::AppError;
use crate::state::AppState;

/// Field names that carry files. `file` is the single-upload form older clients post.
const FILE_FIELDS: [&str; 2] = ["files", "file"];

const MAX_TEXT_FIELD_BYTES: usize = 64 * 1024;

fn multipart_error(err: impl std::fmt::Display) -> AppError {
  AppError::bad_request(format!("File upload error: {}", err))
}

/// Drains one multipart field, refusing to hold more than `limit` bytes.
async fn read_field(field: &mut Field, limit: usize, label: &str) -> Result<BytesMut, AppError> {
  let mut buf = BytesMut::new();
  while let Some(chunk) = field.try_next().await.map_err(multipart_error)? {
    if buf.len() + chunk.len() > limit {
      return Err(AppError::bad_request(format!(
        "Field {} exceeds the {} byte upload limit",
        label, limit
      )));
    }
    buf.extend_from_slice(&chunk);
  }
  Ok(buf)
}

/// Splits a multipart body into the listing's text fields and its file attachments.
pub async fn read_listing(mut payload: Multipart, max_file_bytes: usize) -> Result<(ListingForm, Vec<Attachment>), AppError> {
  let mut form = ListingForm::default();
  let mut attachments = Vec::new();

  while let Some(mut field) = payload.try_next().await.map_err(multipart_error)? {
    let disposition = field.content_disposition();
    let name = disposition.and_then(|cd| cd.get_name()).unwrap_or_default().to_string();
    let file_name = disposition.and_then(|cd| cd.get_filename()).map(str::to_string);
    let content_type = field.content_type().map(|mime| mime.to_string());

    match file_name {
      Some(file_name) if FILE_FIELDS.contains(&name.as_str()) => {
        let body = read_field(&mut field, max_file_bytes, &file_name).await?;
        // Browsers post an empty, unnamed part for a file input left blank.
        if file_name.is_empty() && body.is_empty() {
          continue;
        }
        debug!(%file_name, bytes = body.len(), "Received attachment.");
        attachments.push(Attachment::from_bytes(file_name, content_type, body.freeze()));
      }
      _ => match form.field_mut(&name) {
        Some(slot) => {
          let body = read_field(&mut field, MAX_TEXT_FIELD_BYTES, &name).await?;
          let value = String::from_utf8(body.to_vec())
            .map_err(|_| AppError::bad_request(format!("Field {} is not valid UTF-8", name)))?;
          *slot = Some(value);
        }
        None => {
          debug!(field = %name, "Ignoring unknown form field.");
          while field.try_next().await.map_err(multipart_error)?.is_some() {}
        }
      },
    }
  }

  Ok((form, attachments))
}

#[instrument(name = "handler::create_product", skip(app_state, payload))]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  payload: Multipart,
) -> Result<HttpResponse, AppError> {
  let (form, attachments) = read_listing(payload, app_state.max_upload_bytes).await?;
  info!(attachments = attachments.len(), "Listing received.");

  let product = app_state.catalog.create(form, attachments).await?;
  info!(product_id = product.id, "Listing created.");
  Ok(HttpResponse::Ok().json(product))
}
