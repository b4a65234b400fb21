// catalog_core/src/pipeline/mod.rs

//! A small step engine: named steps, `before`/`on`/`after` async handlers, a
//! shared lockable context, early stop. The catalog's write workflows (ingestion,
//! create) are expressed as pipelines over their own context structs.

pub mod context_data;
pub mod control;
pub mod definition;
pub mod execution;
pub mod hooks;
pub mod step;

pub use context_data::ContextData;
pub use control::{PipelineControl, PipelineResult};
pub use definition::Pipeline;
pub use step::{Handler, Phase, StepDef};
