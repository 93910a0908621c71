pub mod config;
mod streaming;
mod types;

pub use streaming::{run_composite, run_composite_reported, StreamingPipeline};
pub use types::{
    CallbackReporter, CancelToken, NoOpReporter, PipelineOutcome, PipelineStage, ProgressReporter,
};
