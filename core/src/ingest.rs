// catalog_core/src/ingest.rs

//! Ingestion pipeline: turns the file attachments of one write request into an
//! ordered list of object-store locators.
//!
//! Steps, in order:
//!  1. `require_attachments` rejects an empty file set (no image-less listings).
//!  2. `buffer_attachments` reads every attachment fully into memory.
//!  3. `upload_attachments` puts all buffered files concurrently and collects
//!     the locators in submission order.
//!
//! A failure anywhere fails the whole ingestion. Objects uploaded before the
//! failure are left in the bucket; nothing is rolled back.

use crate::error::{CatalogError, CatalogResult};
use crate::object_store::{object_key, ObjectStore};
use crate::pipeline::{ContextData, Pipeline, PipelineControl, PipelineResult};
use bytes::Bytes;
use chrono::Utc;
use futures::future::try_join_all;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, info, instrument, warn};

/// Byte source of one attachment.
pub type AttachmentReader = Box<dyn AsyncRead + Send + Sync + Unpin>;

/// One file attached to a write request.
pub struct Attachment {
  pub file_name: String,
  pub content_type: Option<String>,
  reader: AttachmentReader,
}

impl Attachment {
  pub fn from_reader(
    file_name: impl Into<String>,
    content_type: Option<String>,
    reader: impl AsyncRead + Send + Sync + Unpin + 'static,
  ) -> Self {
    Self {
      file_name: file_name.into(),
      content_type,
      reader: Box::new(reader),
    }
  }

  /// An attachment whose bytes are already in memory.
  pub fn from_bytes(file_name: impl Into<String>, content_type: Option<String>, body: impl Into<Bytes>) -> Self {
    Self::from_reader(file_name, content_type, std::io::Cursor::new(body.into()))
  }
}

impl std::fmt::Debug for Attachment {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Attachment")
      .field("file_name", &self.file_name)
      .field("content_type", &self.content_type)
      .finish_non_exhaustive()
  }
}

#[derive(Debug)]
struct BufferedFile {
  file_name: String,
  content_type: Option<String>,
  body: Bytes,
}

#[derive(Debug, Default)]
struct IngestCtxData {
  pending: Vec<Attachment>,
  buffered: Vec<BufferedFile>,
  locators: Vec<String>,
}

/// Cheap to clone; every clone shares the same pipeline and object store.
#[derive(Clone)]
pub struct IngestionPipeline {
  pipeline: Arc<Pipeline<IngestCtxData, CatalogError>>,
}

impl IngestionPipeline {
  pub fn new(object_store: Arc<dyn ObjectStore>) -> Self {
    let mut pipeline = Pipeline::<IngestCtxData, CatalogError>::new(
      "ingest_images",
      &[
        ("require_attachments", false),
        ("buffer_attachments", false),
        ("upload_attachments", false),
      ],
    );

    pipeline.on_root("require_attachments", |ctx_data: ContextData<IngestCtxData>| async move {
      if ctx_data.read().pending.is_empty() {
        return Err(CatalogError::validation("No files uploaded"));
      }
      Ok(PipelineControl::Continue)
    });

    pipeline.on_root("buffer_attachments", |ctx_data: ContextData<IngestCtxData>| async move {
      let pending = ctx_data.take(|d| &mut d.pending);
      let mut buffered = Vec::with_capacity(pending.len());
      for mut attachment in pending {
        let mut body = Vec::new();
        if let Err(e) = attachment.reader.read_to_end(&mut body).await {
          warn!(file_name = %attachment.file_name, error = %e, "Attachment could not be read.");
          return Err(CatalogError::Upload(format!("Failed to open file: {}", e)));
        }
        debug!(file_name = %attachment.file_name, bytes = body.len(), "Attachment buffered.");
        buffered.push(BufferedFile {
          file_name: attachment.file_name,
          content_type: attachment.content_type,
          body: Bytes::from(body),
        });
      }
      ctx_data.write().buffered = buffered;
      Ok::<_, CatalogError>(PipelineControl::Continue)
    });

    pipeline.before_root("upload_attachments", |ctx_data: ContextData<IngestCtxData>| async move {
      let guard = ctx_data.read();
      let total_bytes: usize = guard.buffered.iter().map(|file| file.body.len()).sum();
      info!(files = guard.buffered.len(), total_bytes, "Uploading attachments.");
      Ok::<_, CatalogError>(PipelineControl::Continue)
    });

    pipeline.on_root("upload_attachments", move |ctx_data: ContextData<IngestCtxData>| {
      let object_store = object_store.clone();
      async move {
        let buffered = ctx_data.take(|d| &mut d.buffered);
        let started_at = Utc::now();
        // try_join_all yields results in input order, whatever order the puts finish in.
        let uploads = buffered.into_iter().enumerate().map(|(position, file)| {
          let object_store = object_store.clone();
          async move {
            let key = object_key(started_at, position, &file.file_name);
            let locator = object_store
              .put_object(&key, file.body, file.content_type.as_deref())
              .await
              .map_err(|e| CatalogError::Upload(format!("S3 upload error: {:#}", e)))?;
            debug!(%key, %locator, "Object stored.");
            Ok::<_, CatalogError>(locator)
          }
        });
        let locators = try_join_all(uploads).await?;
        ctx_data.write().locators = locators;
        Ok::<_, CatalogError>(PipelineControl::Continue)
      }
    });

    Self {
      pipeline: Arc::new(pipeline),
    }
  }

  /// Uploads every attachment and returns the locators in submission order.
  #[instrument(name = "ingest::run", skip_all, fields(attachments = attachments.len()))]
  pub async fn ingest(&self, attachments: Vec<Attachment>) -> CatalogResult<Vec<String>> {
    let ctx_data = ContextData::new(IngestCtxData {
      pending: attachments,
      ..Default::default()
    });

    match self.pipeline.run(ctx_data.clone()).await? {
      PipelineResult::Completed => {
        let locators = ctx_data.take(|d| &mut d.locators);
        info!(uploaded = locators.len(), "Attachments ingested.");
        Ok(locators)
      }
      PipelineResult::Stopped => Err(CatalogError::Internal(
        "Ingestion halted before every file was uploaded".to_string(),
      )),
    }
  }
}

impl std::fmt::Debug for IngestionPipeline {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("IngestionPipeline").field("pipeline", &self.pipeline).finish()
  }
}
