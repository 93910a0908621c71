use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::size::CompositionPlan;

/// Pipeline processing stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStage {
    Validating,
    Preprocessing,
    Compositing,
    Encoding,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validating => write!(f, "Validating frames"),
            Self::Preprocessing => write!(f, "Preprocessing frames"),
            Self::Compositing => write!(f, "Compositing"),
            Self::Encoding => write!(f, "Writing output"),
        }
    }
}

/// How a streaming run ended when it did not fail.
#[derive(Clone, Debug, PartialEq)]
pub enum PipelineOutcome {
    Completed {
        output: PathBuf,
        plan: CompositionPlan,
    },
    /// Stopped at a checkpoint on request. Nothing was written.
    Cancelled,
}

impl PipelineOutcome {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Thread-safe progress reporting and cancellation polling.
///
/// The pipeline calls these at its checkpoints: after every preprocessed
/// frame and every few composed rows. All methods have no-op defaults.
pub trait ProgressReporter: Send + Sync {
    /// A new pipeline stage has started. `total_items` is the number of
    /// work items in this stage (frames or rows), if known.
    fn begin_stage(&self, _stage: PipelineStage, _total_items: Option<usize>) {}

    /// One work item within the current stage has completed.
    fn advance(&self, _items_done: usize) {}

    /// The current stage is finished.
    fn finish_stage(&self) {}

    /// Overall completion, 0..=100.
    fn set_percent(&self, _percent: u8) {}

    /// Polled at every checkpoint; returning true stops the run.
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// No-op progress reporter.
pub struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}

/// Shared cancellation flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

impl ProgressReporter for CancelToken {
    fn is_cancelled(&self) -> bool {
        CancelToken::is_cancelled(self)
    }
}

/// Reporter built from a percentage callback and a cancellation predicate.
pub struct CallbackReporter<P, C> {
    on_percent: P,
    cancelled: C,
}

impl<P, C> CallbackReporter<P, C>
where
    P: Fn(u8) + Send + Sync,
    C: Fn() -> bool + Send + Sync,
{
    pub fn new(on_percent: P, cancelled: C) -> Self {
        Self {
            on_percent,
            cancelled,
        }
    }
}

impl<P, C> ProgressReporter for CallbackReporter<P, C>
where
    P: Fn(u8) + Send + Sync,
    C: Fn() -> bool + Send + Sync,
{
    fn set_percent(&self, percent: u8) {
        (self.on_percent)(percent);
    }

    fn is_cancelled(&self) -> bool {
        (self.cancelled)()
    }
}
