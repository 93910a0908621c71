//! Headless application state: the frame list, print parameters and size
//! mode behind one owner, so the derived plan can never disagree with them.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use image::RgbaImage;

use crate::composite::build_preview;
use crate::consts::{DEFAULT_DEBOUNCE, MAX_LPI, MIN_LPI};
use crate::error::{GratingError, Result};
use crate::frame::{check_frame_extension, FrameList, ImportMode};
use crate::io::image_io::{probe_frame, FrameCodec, ImageCodec};
use crate::pipeline::config::{CompositeConfig, Direction, PrintParameters};
use crate::size::{
    CompositionPlan, PendingOverride, SizeModeController, SizeState, Transition, WidthEdit,
};

/// Coalesces bursts of change notifications into one refresh.
#[derive(Clone, Copy, Debug)]
pub struct Debouncer {
    window: Duration,
    armed_at: Option<Instant>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            armed_at: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Record a change; restarts the quiescence window.
    pub fn notify(&mut self, now: Instant) {
        self.armed_at = Some(now);
    }

    pub fn is_pending(&self) -> bool {
        self.armed_at.is_some()
    }

    /// True once per burst, when `window` has passed since the last change.
    pub fn ready(&mut self, now: Instant) -> bool {
        match self.armed_at {
            Some(at) if now.saturating_duration_since(at) >= self.window => {
                self.armed_at = None;
                true
            }
            _ => false,
        }
    }
}

/// Result of a frame-list edit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ListEdit {
    /// Row to select afterwards, if any.
    pub selection: Option<usize>,
    pub transition: Transition,
}

pub struct Session {
    frames: FrameList,
    params: PrintParameters,
    size: SizeState,
    controller: SizeModeController,
    refresh: Debouncer,
    codec: Arc<dyn FrameCodec>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Arc::new(ImageCodec))
    }
}

impl Session {
    pub fn new(codec: Arc<dyn FrameCodec>) -> Self {
        Self {
            frames: FrameList::new(),
            params: PrintParameters::default(),
            size: SizeState::Automatic,
            controller: SizeModeController::default(),
            refresh: Debouncer::default(),
            codec,
        }
    }

    pub fn with_controller(mut self, controller: SizeModeController) -> Self {
        self.controller = controller;
        self
    }

    pub fn with_debounce(mut self, window: Duration) -> Self {
        self.refresh = Debouncer::new(window);
        self
    }

    pub fn with_params(mut self, params: PrintParameters) -> Result<Self> {
        params.validate()?;
        self.params = params;
        Ok(self)
    }

    pub fn frames(&self) -> &FrameList {
        &self.frames
    }

    pub fn params(&self) -> &PrintParameters {
        &self.params
    }

    pub fn size_state(&self) -> SizeState {
        self.size
    }

    pub fn codec(&self) -> Arc<dyn FrameCodec> {
        Arc::clone(&self.codec)
    }

    // --- frame list ---

    /// Add frames. Every path must have a supported extension or nothing is
    /// imported.
    pub fn import<I, P>(&mut self, paths: I, mode: ImportMode) -> Result<Transition>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let paths: Vec<PathBuf> = paths.into_iter().map(Into::into).collect();
        if paths.is_empty() {
            return Ok(self.unchanged());
        }
        for path in &paths {
            check_frame_extension(path)?;
        }
        self.frames.import(paths, mode);
        Ok(self.structural_change())
    }

    pub fn remove(&mut self, indices: &[usize]) -> Result<ListEdit> {
        let selection = self.frames.remove(indices)?;
        Ok(ListEdit {
            selection,
            transition: self.structural_change(),
        })
    }

    pub fn move_up(&mut self, index: usize) -> Result<ListEdit> {
        let selection = self.frames.move_up(index)?;
        Ok(ListEdit {
            selection: Some(selection),
            transition: self.structural_change(),
        })
    }

    pub fn move_down(&mut self, index: usize) -> Result<ListEdit> {
        let selection = self.frames.move_down(index)?;
        Ok(ListEdit {
            selection: Some(selection),
            transition: self.structural_change(),
        })
    }

    // --- print parameters ---

    pub fn set_direction(&mut self, direction: Direction) -> Transition {
        if self.params.direction == direction {
            return self.unchanged();
        }
        self.params.direction = direction;
        self.structural_change()
    }

    pub fn set_band_width(&mut self, band_width_px: u32) -> Result<Transition> {
        if band_width_px < 1 {
            return Err(GratingError::InvalidParameter(
                "band width must be at least 1 pixel".into(),
            ));
        }
        if self.params.band_width_px == band_width_px {
            return Ok(self.unchanged());
        }
        self.params.band_width_px = band_width_px;
        Ok(self.structural_change())
    }

    pub fn set_actual_lpi(&mut self, lpi: f64) -> Result<Transition> {
        check_lpi("actual LPI", lpi)?;
        if self.params.actual_lpi == lpi {
            return Ok(self.unchanged());
        }
        self.params.actual_lpi = lpi;
        Ok(self.structural_change())
    }

    pub fn set_calibrated_lpi(&mut self, lpi: f64) -> Result<Transition> {
        check_lpi("calibrated LPI", lpi)?;
        if self.params.calibrated_lpi == lpi {
            return Ok(self.unchanged());
        }
        self.params.calibrated_lpi = lpi;
        Ok(self.structural_change())
    }

    // --- print width ---

    /// Physical width currently in effect.
    pub fn effective_width_cm(&self) -> Result<f64> {
        if let SizeState::ManualOverride { width_cm } = self.size {
            return Ok(width_cm);
        }
        let Some(first) = self.frames.first() else {
            return Ok(0.0);
        };
        let native = probe_frame(self.codec.as_ref(), first)?;
        Ok(self
            .controller
            .effective_width_cm(self.size, native, self.frames.len(), &self.params))
    }

    /// The user finished editing the desired width.
    ///
    /// A [`WidthEdit::Pending`] result changes nothing until it is passed to
    /// [`Session::accept_width`].
    pub fn edit_width(&mut self, requested_cm: f64) -> Result<WidthEdit> {
        let edit = match self.frames.first() {
            None => WidthEdit::Reset(self.controller.reset(self.size)),
            Some(first) => {
                let native = probe_frame(self.codec.as_ref(), first)?;
                self.controller.edit_width(
                    self.size,
                    requested_cm,
                    native,
                    self.frames.len(),
                    &self.params,
                )?
            }
        };
        if let WidthEdit::Reset(transition) = edit {
            self.size = transition.state;
            self.touch();
        }
        Ok(edit)
    }

    pub fn accept_width(&mut self, pending: PendingOverride) -> SizeState {
        self.size = pending.accept();
        self.touch();
        self.size
    }

    pub fn reset_width(&mut self) -> Transition {
        let transition = self.controller.reset(self.size);
        self.size = transition.state;
        self.touch();
        transition
    }

    // --- derived data ---

    pub fn plan(&self) -> Result<CompositionPlan> {
        CompositionPlan::for_frames(&self.frames, &self.params, self.size, self.codec.as_ref())
    }

    pub fn preview(&self, max_edge: u32) -> Result<RgbaImage> {
        let plan = self.plan()?;
        build_preview(&self.frames, &plan, self.codec.as_ref(), max_edge)
    }

    /// Job description for the streaming pipeline.
    pub fn config(&self, output: &Path) -> CompositeConfig {
        CompositeConfig {
            frames: self.frames.clone(),
            output: output.to_path_buf(),
            print: self.params,
            width_cm: self.size.pinned_width_cm().unwrap_or(0.0),
            ..CompositeConfig::default()
        }
    }

    /// Whether a debounced refresh is due at `now`. Fires once per burst.
    pub fn refresh_due(&mut self, now: Instant) -> bool {
        self.refresh.ready(now)
    }

    pub fn refresh_pending(&self) -> bool {
        self.refresh.is_pending()
    }

    fn structural_change(&mut self) -> Transition {
        let transition = self.controller.structural_change(self.size);
        self.size = transition.state;
        self.touch();
        transition
    }

    fn unchanged(&self) -> Transition {
        Transition {
            state: self.size,
            pin_cleared: false,
        }
    }

    fn touch(&mut self) {
        self.refresh.notify(Instant::now());
    }
}

fn check_lpi(name: &str, lpi: f64) -> Result<()> {
    if (MIN_LPI..=MAX_LPI).contains(&lpi) {
        Ok(())
    } else {
        Err(GratingError::InvalidParameter(format!(
            "{name} {lpi} outside [{MIN_LPI}, {MAX_LPI}]"
        )))
    }
}
