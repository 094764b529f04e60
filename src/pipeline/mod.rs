mod error;
mod runner;
mod types;

pub use error::{IntakeError, PipelineError};
pub use runner::PipelineRunner;
pub use types::{
    is_supported_document, stage_batch, BatchOutcome, PipelineEvent, RunPhase, StagedFile,
};
