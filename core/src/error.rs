// catalog_core/src/error.rs
use thiserror::Error;

/// Failures raised by the step engine itself, independent of what the steps do.
#[derive(Debug, Error)]
pub enum PipelineError {
  #[error("Step not found: {step_name}")]
  StepNotFound { step_name: String },

  #[error("Handler missing for non-optional step: {step_name}")]
  HandlerMissing { step_name: String },
}

/// Error taxonomy for every catalog operation.
///
/// The variants map one-to-one onto response classes: `Validation` is the
/// client's fault, `NotFound` is an id-scoped miss, everything else is ours.
#[derive(Debug, Error)]
pub enum CatalogError {
  /// Malformed or missing required input.
  #[error("{0}")]
  Validation(String),

  /// No row matched an id-scoped operation.
  #[error("{0}")]
  NotFound(String),

  /// A stored attribute is not valid for its codec. Indicates corrupt rows.
  #[error("Failed to decode stored {field}: {message}")]
  Decode { field: &'static str, message: String },

  /// Object store rejection or attachment stream failure during ingestion.
  #[error("{0}")]
  Upload(String),

  /// Generic persistence-layer failure, carrying the driver's message.
  #[error("{0}")]
  Store(String),

  #[error("Internal error: {0}")]
  Internal(String),
}

impl CatalogError {
  pub fn validation(message: impl Into<String>) -> Self {
    CatalogError::Validation(message.into())
  }

  pub fn not_found(message: impl Into<String>) -> Self {
    CatalogError::NotFound(message.into())
  }

  pub fn store(err: impl std::fmt::Display) -> Self {
    CatalogError::Store(format!("Database query error: {}", err))
  }
}

impl From<PipelineError> for CatalogError {
  fn from(err: PipelineError) -> Self {
    CatalogError::Internal(err.to_string())
  }
}

pub type CatalogResult<T, E = CatalogError> = std::result::Result<T, E>;
