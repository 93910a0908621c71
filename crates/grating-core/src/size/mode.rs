use tracing::{debug, warn};

use crate::consts::WIDTH_EPSILON_CM;
use crate::error::{GratingError, Result};
use crate::frame::PixelSize;
use crate::pipeline::config::PrintParameters;

use super::calculator::{physical_size, target_pixel_size};

/// Which conversion direction is authoritative for the print size.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum SizeState {
    /// Output pixels are the first frame's native pixels; the physical width
    /// follows from them.
    #[default]
    Automatic,
    /// The physical width is pinned; output pixels follow from it.
    ManualOverride { width_cm: f64 },
}

impl SizeState {
    pub fn is_manual(&self) -> bool {
        matches!(self, Self::ManualOverride { .. })
    }

    pub fn pinned_width_cm(&self) -> Option<f64> {
        match self {
            Self::Automatic => None,
            Self::ManualOverride { width_cm } => Some(*width_cm),
        }
    }
}

impl std::fmt::Display for SizeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Automatic => write!(f, "Automatic"),
            Self::ManualOverride { width_cm } => write!(f, "Manual ({width_cm:.2} cm)"),
        }
    }
}

/// New size state plus whether a manual pin was dropped on the way.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    pub state: SizeState,
    pub pin_cleared: bool,
}

/// Outcome of the user finishing a width edit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WidthEdit {
    /// Non-positive width: back to automatic sizing.
    Reset(Transition),
    /// Within epsilon of the current effective width; nothing to do.
    Unchanged { effective_width_cm: f64 },
    /// A real change that the user still has to confirm.
    Pending(PendingOverride),
}

/// A manual width awaiting confirmation. Accepting yields the pinned state;
/// dropping it leaves the current state untouched.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PendingOverride {
    pub width_cm: f64,
    /// Output size the pin would produce, for the confirmation prompt.
    pub target: PixelSize,
}

impl PendingOverride {
    pub fn accept(self) -> SizeState {
        debug!(width_cm = self.width_cm, target = %self.target, "Print width pinned");
        SizeState::ManualOverride {
            width_cm: self.width_cm,
        }
    }
}

/// Size-mode transitions. Stateless apart from the noise threshold: every
/// method takes the current [`SizeState`] and returns the next one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SizeModeController {
    pub epsilon_cm: f64,
}

impl Default for SizeModeController {
    fn default() -> Self {
        Self {
            epsilon_cm: WIDTH_EPSILON_CM,
        }
    }
}

impl SizeModeController {
    pub fn with_epsilon(epsilon_cm: f64) -> Self {
        Self { epsilon_cm }
    }

    /// Frame list, direction, band width or an LPI changed.
    pub fn structural_change(&self, state: SizeState) -> Transition {
        let pin_cleared = state.is_manual();
        if pin_cleared {
            warn!(previous = %state, "Parameters changed, print width reset to automatic");
        }
        Transition {
            state: SizeState::Automatic,
            pin_cleared,
        }
    }

    /// Explicit reset by the user.
    pub fn reset(&self, state: SizeState) -> Transition {
        Transition {
            state: SizeState::Automatic,
            pin_cleared: state.is_manual(),
        }
    }

    /// Width the user currently sees: the pin, or the physical width of the
    /// native first frame.
    pub fn effective_width_cm(
        &self,
        state: SizeState,
        native: PixelSize,
        frame_count: usize,
        params: &PrintParameters,
    ) -> f64 {
        match state {
            SizeState::ManualOverride { width_cm } => width_cm,
            SizeState::Automatic => {
                physical_size(
                    native,
                    frame_count,
                    params.band_width_px,
                    params.calibrated_lpi,
                )
                .width_cm
            }
        }
    }

    /// The user finished typing a desired width of `requested_cm`.
    pub fn edit_width(
        &self,
        state: SizeState,
        requested_cm: f64,
        native: PixelSize,
        frame_count: usize,
        params: &PrintParameters,
    ) -> Result<WidthEdit> {
        if !(requested_cm > 0.0) || frame_count == 0 {
            return Ok(WidthEdit::Reset(self.reset(state)));
        }

        let effective_width_cm = self.effective_width_cm(state, native, frame_count, params);
        if (requested_cm - effective_width_cm).abs() < self.epsilon_cm {
            debug!(requested_cm, effective_width_cm, "Width edit within noise threshold");
            return Ok(WidthEdit::Unchanged { effective_width_cm });
        }

        let target = target_pixel_size(
            requested_cm,
            native,
            frame_count,
            params.band_width_px,
            params.calibrated_lpi,
        );
        if target.is_empty() {
            return Err(GratingError::OutputTooSmall {
                width: target.width,
                height: target.height,
            });
        }

        Ok(WidthEdit::Pending(PendingOverride {
            width_cm: requested_cm,
            target,
        }))
    }
}
