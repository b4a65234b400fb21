// src/lib.rs

//! Catalog core: the domain side of a product-listing service.
//!
//!  - `model`: products, create/update forms and their stored-row forms.
//!  - `codec`: the textual forms `images` and `categories` are persisted in.
//!  - `store` / `object_store`: the seams to the relational table and the blob bucket.
//!  - `pipeline`: a small async step engine the write workflows are built on.
//!  - `ingest`: attachments in, ordered object locators out.
//!  - `service`: the request-level operations tying it all together.
//!  - `memory`: in-process store implementations for tests and local runs.

pub mod codec;
pub mod error;
pub mod ingest;
pub mod memory;
pub mod model;
pub mod object_store;
pub mod pipeline;
pub mod service;
pub mod store;

pub use crate::error::{CatalogError, CatalogResult, PipelineError};
pub use crate::ingest::{Attachment, AttachmentReader, IngestionPipeline};
pub use crate::model::{ListingForm, NewProduct, Product, ProductId, ProductUpdate, StoredProduct};
pub use crate::object_store::ObjectStore;
pub use crate::pipeline::{ContextData, Handler, Pipeline, PipelineControl, PipelineResult};
pub use crate::service::CatalogService;
pub use crate::store::CatalogStore;
