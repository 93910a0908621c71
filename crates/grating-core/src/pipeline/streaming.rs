use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use image::imageops::{self, FilterType};
use image::RgbaImage;
use tracing::{debug, info, warn};

use crate::composite::compose_row;
use crate::consts::DEFAULT_CHECKPOINT_ROWS;
use crate::error::{GratingError, Result};
use crate::frame::{FrameList, PixelSize};
use crate::io::image_io::{load_frame, probe_frame, FrameCodec, ImageCodec};
use crate::io::scratch::ScratchSet;
use crate::size::{CompositionPlan, SizeState};

use super::config::{CompositeConfig, PrintParameters};
use super::types::{CallbackReporter, PipelineOutcome, PipelineStage, ProgressReporter};

/// Full-resolution composite generation with bounded memory.
///
/// Stage 1 resizes every frame to the output size and dumps it to a raw
/// scratch file. Stage 2 allocates the output once and fills it row by row,
/// reading the matching row of every scratch file. Peak memory is one output
/// image, one resized frame and one row per frame.
///
/// A pipeline refuses to start a second run while one is active. By default
/// the busy flag belongs to the instance; [`StreamingPipeline::with_process_guard`]
/// shares one flag across every pipeline in the process.
pub struct StreamingPipeline {
    codec: Arc<dyn FrameCodec>,
    scratch_root: PathBuf,
    checkpoint_rows: u32,
    guard: RunGuard,
}

/// Busy flag shared by all pipelines built with `with_process_guard`.
static PROCESS_RUN: AtomicBool = AtomicBool::new(false);

enum RunGuard {
    Instance(AtomicBool),
    Process,
}

impl RunGuard {
    fn flag(&self) -> &AtomicBool {
        match self {
            Self::Instance(flag) => flag,
            Self::Process => &PROCESS_RUN,
        }
    }
}

/// Clears the pipeline's active flag when the run ends.
struct ActiveRun<'a>(&'a AtomicBool);

impl Drop for ActiveRun<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Default for StreamingPipeline {
    fn default() -> Self {
        Self::new(Arc::new(ImageCodec))
    }
}

impl StreamingPipeline {
    pub fn new(codec: Arc<dyn FrameCodec>) -> Self {
        Self {
            codec,
            scratch_root: std::env::temp_dir(),
            checkpoint_rows: DEFAULT_CHECKPOINT_ROWS,
            guard: RunGuard::Instance(AtomicBool::new(false)),
        }
    }

    /// Directory under which each run creates its private scratch directory.
    pub fn with_scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = root.into();
        self
    }

    /// Rows composed between progress/cancellation checkpoints (at least 1).
    pub fn with_checkpoint_rows(mut self, rows: u32) -> Self {
        self.checkpoint_rows = rows.max(1);
        self
    }

    /// Share the busy flag with every other process-guarded pipeline, so at
    /// most one of them runs at a time.
    pub fn with_process_guard(mut self) -> Self {
        self.guard = RunGuard::Process;
        self
    }

    pub fn is_running(&self) -> bool {
        self.guard.flag().load(Ordering::Acquire)
    }

    /// Decode every frame once and derive the plan. No scratch I/O happens
    /// here, so an unreadable frame fails before anything is written.
    pub fn validate(
        &self,
        frames: &FrameList,
        params: &PrintParameters,
        size_state: SizeState,
    ) -> Result<CompositionPlan> {
        if frames.is_empty() {
            return Err(GratingError::EmptyFrameList);
        }
        params.validate()?;
        let mut native: Option<PixelSize> = None;
        for path in frames.iter() {
            let size = probe_frame(self.codec.as_ref(), path)?;
            self.codec.verify(path)?;
            native.get_or_insert(size);
        }
        let native = native.ok_or(GratingError::EmptyFrameList)?;
        CompositionPlan::derive(native, frames.len(), params, size_state)
    }

    /// Generate the composite and write it to `output`.
    ///
    /// On failure or cancellation every scratch file is gone and `output` is
    /// left as it was.
    pub fn run(
        &self,
        frames: &FrameList,
        params: &PrintParameters,
        size_state: SizeState,
        output: &Path,
        reporter: &dyn ProgressReporter,
    ) -> Result<PipelineOutcome> {
        let _active = self.begin()?;

        reporter.begin_stage(PipelineStage::Validating, Some(frames.len()));
        let plan = self.validate(frames, params, size_state)?;
        reporter.finish_stage();

        if plan.is_oversized() {
            warn!(size = %plan.output, "Output exceeds the large-image threshold");
        }
        info!(
            frames = plan.frame_count,
            size = %plan.output,
            dpi = plan.required_dpi,
            direction = %plan.direction,
            band_width = plan.band_width_px,
            "Starting composite"
        );
        reporter.set_percent(0);

        let Some(mut scratch) = self
            .preprocess(frames, &plan, reporter)
            .map_err(|e| e.in_stage(PipelineStage::Preprocessing))?
        else {
            info!("Composite cancelled during preprocessing");
            return Ok(PipelineOutcome::Cancelled);
        };

        let composed = self
            .compose(&mut scratch, &plan, reporter)
            .map_err(|e| e.in_stage(PipelineStage::Compositing))?;
        scratch
            .close()
            .map_err(|e| e.in_stage(PipelineStage::Compositing))?;
        let Some(image) = composed else {
            info!("Composite cancelled during compositing");
            return Ok(PipelineOutcome::Cancelled);
        };
        if reporter.is_cancelled() {
            info!("Composite cancelled before writing output");
            return Ok(PipelineOutcome::Cancelled);
        }

        reporter.begin_stage(PipelineStage::Encoding, None);
        self.encode(&image, output)
            .map_err(|e| e.in_stage(PipelineStage::Encoding))?;
        reporter.finish_stage();
        reporter.set_percent(100);
        info!(output = %output.display(), "Composite saved");

        Ok(PipelineOutcome::Completed {
            output: output.to_path_buf(),
            plan,
        })
    }

    fn begin(&self) -> Result<ActiveRun<'_>> {
        let flag = self.guard.flag();
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| GratingError::PipelineBusy)?;
        Ok(ActiveRun(flag))
    }

    /// Stage 1: decode, resize, normalize and persist each frame in order.
    /// Returns `None` if cancelled.
    fn preprocess(
        &self,
        frames: &FrameList,
        plan: &CompositionPlan,
        reporter: &dyn ProgressReporter,
    ) -> Result<Option<ScratchSet>> {
        let total = frames.len();
        reporter.begin_stage(PipelineStage::Preprocessing, Some(total));
        let mut scratch = ScratchSet::create(
            &self.scratch_root,
            plan.bytes_per_row(),
            plan.output.height as usize,
        )?;

        for (i, path) in frames.iter().enumerate() {
            if reporter.is_cancelled() {
                return Ok(None);
            }
            let frame = load_frame(self.codec.as_ref(), path)?;
            let resized = resize_to(frame, plan.output);
            scratch.push(resized.as_raw())?;
            debug!(frame = i, path = %path.display(), "Frame preprocessed");
            reporter.advance(i + 1);
            reporter.set_percent(percent_of(i + 1, total, 0));
        }
        if reporter.is_cancelled() {
            return Ok(None);
        }
        reporter.finish_stage();
        Ok(Some(scratch))
    }

    /// Stage 2: fill the output one row at a time from the scratch buffers.
    /// Returns `None` if cancelled.
    fn compose(
        &self,
        scratch: &mut ScratchSet,
        plan: &CompositionPlan,
        reporter: &dyn ProgressReporter,
    ) -> Result<Option<RgbaImage>> {
        let height = plan.output.height as usize;
        reporter.begin_stage(PipelineStage::Compositing, Some(height));

        let bytes = plan.output_bytes();
        let mut pixels: Vec<u8> = Vec::new();
        pixels
            .try_reserve_exact(bytes)
            .map_err(|_| GratingError::Allocation { bytes })?;
        pixels.resize(bytes, 0);

        let row_bytes = plan.bytes_per_row();
        let mut rows = vec![vec![0u8; row_bytes]; scratch.len()];
        let checkpoint = self.checkpoint_rows as usize;

        for (y, out_row) in pixels.chunks_exact_mut(row_bytes).enumerate() {
            if y % checkpoint == 0 {
                reporter.advance(y);
                reporter.set_percent(percent_of(y, height, 50));
                if reporter.is_cancelled() {
                    return Ok(None);
                }
            }
            scratch.read_rows(y, &mut rows)?;
            compose_row(out_row, &rows, y as u32, plan.direction, plan.band_width_px)?;
        }
        reporter.advance(height);
        reporter.finish_stage();

        let (w, h) = (plan.output.width, plan.output.height);
        RgbaImage::from_raw(w, h, pixels)
            .map(Some)
            .ok_or(GratingError::InvalidDimensions {
                width: w,
                height: h,
            })
    }

    /// Encode into a staging file next to `output`, then rename it into place.
    fn encode(&self, image: &RgbaImage, output: &Path) -> Result<()> {
        let parent = match output.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let suffix = output
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{e}"))
            .unwrap_or_else(|| ".png".into());
        let staging = tempfile::Builder::new()
            .prefix(".grating-")
            .suffix(&suffix)
            .tempfile_in(parent)?
            .into_temp_path();

        self.codec.encode(image, &staging)?;
        staging.persist(output).map_err(|e| GratingError::Io(e.error))?;
        Ok(())
    }
}

fn resize_to(frame: RgbaImage, size: PixelSize) -> RgbaImage {
    if frame.dimensions() == (size.width, size.height) {
        frame
    } else {
        imageops::resize(&frame, size.width, size.height, FilterType::Lanczos3)
    }
}

/// Map `done / total` onto a 50-point window starting at `base`.
fn percent_of(done: usize, total: usize, base: u8) -> u8 {
    if total == 0 {
        return base + 50;
    }
    let span = (done.min(total) * 50 / total) as u8;
    base + span
}

/// Run a configured composite with a thread-safe progress reporter.
///
/// Uses the process-wide guard: a call made while another `run_composite*`
/// call is active fails with [`GratingError::PipelineBusy`].
pub fn run_composite_reported(
    config: &CompositeConfig,
    codec: Arc<dyn FrameCodec>,
    reporter: &dyn ProgressReporter,
) -> Result<PipelineOutcome> {
    StreamingPipeline::new(codec).with_process_guard().run(
        &config.frames,
        &config.print,
        config.size_state(),
        &config.output,
        reporter,
    )
}

/// Run a configured composite with the default codec.
///
/// `on_progress` receives the overall percentage; the run is not cancellable.
pub fn run_composite<F>(config: &CompositeConfig, on_progress: F) -> Result<PipelineOutcome>
where
    F: Fn(u8) + Send + Sync,
{
    let reporter = CallbackReporter::new(on_progress, || false);
    run_composite_reported(config, Arc::new(ImageCodec), &reporter)
}
