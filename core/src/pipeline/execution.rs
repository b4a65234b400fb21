// catalog_core/src/pipeline/execution.rs

//! `Pipeline::run`: walks the steps in order, phase by phase.

use super::context_data::ContextData;
use super::control::{PipelineControl, PipelineResult};
use super::definition::Pipeline;
use super::step::{Phase, StepDef};
use crate::error::PipelineError;
use tracing::{event, info_span, instrument, Instrument, Level};

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  /// Executes every step against `ctx_data`.
  ///
  /// Within a step, all `before` handlers run, then `on`, then `after`, each in
  /// registration order. The first handler error aborts the run and is returned
  /// unchanged; the first `Stop` ends it with `PipelineResult::Stopped`.
  #[instrument(
    name = "Pipeline::run",
    skip_all,
    fields(pipeline = %self.name, num_steps = self.steps.len()),
    err(Display)
  )]
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<PipelineResult, Err> {
    if let Some(step_name) = self.orphaned_handler_step() {
      event!(Level::ERROR, %step_name, "Handler registered for a step that is not declared.");
      return Err(Err::from(PipelineError::StepNotFound { step_name }));
    }

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_span = info_span!(
        "pipeline_step",
        step_name = %step_def.name,
        step_index = step_idx,
        optional = step_def.optional
      );
      match self.run_step(step_def, &ctx_data).instrument(step_span).await? {
        PipelineControl::Continue => {}
        PipelineControl::Stop => return Ok(PipelineResult::Stopped),
      }
    }

    event!(Level::DEBUG, "Pipeline execution completed.");
    Ok(PipelineResult::Completed)
  }

  async fn run_step(&self, step_def: &StepDef, ctx_data: &ContextData<TData>) -> Result<PipelineControl, Err> {
    let step_name = step_def.name.as_str();
    let has_handlers = Phase::ALL
      .iter()
      .any(|phase| self.handlers(*phase).get(step_name).is_some_and(|h| !h.is_empty()));

    if !has_handlers {
      if step_def.optional {
        event!(Level::DEBUG, "Optional step has no handlers, skipping.");
        return Ok(PipelineControl::Continue);
      }
      event!(Level::ERROR, "Non-optional step has no handlers.");
      return Err(Err::from(PipelineError::HandlerMissing {
        step_name: step_def.name.clone(),
      }));
    }

    for phase in Phase::ALL {
      let Some(handlers) = self.handlers(phase).get(step_name) else {
        continue;
      };
      for (handler_idx, handler_fn) in handlers.iter().enumerate() {
        match handler_fn(ctx_data.clone()).await {
          Ok(PipelineControl::Continue) => {}
          Ok(PipelineControl::Stop) => {
            event!(Level::INFO, phase = phase.as_str(), handler_index = handler_idx, "Pipeline stopped by handler.");
            return Ok(PipelineControl::Stop);
          }
          Err(e) => {
            event!(Level::DEBUG, phase = phase.as_str(), handler_index = handler_idx, error = %e, "Handler failed.");
            return Err(e);
          }
        }
      }
    }
    Ok(PipelineControl::Continue)
  }
}
