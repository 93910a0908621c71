use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_LPI, DEFAULT_PREVIEW_MAX_EDGE, MAX_LPI, MIN_LPI};
use crate::error::{GratingError, Result};
use crate::frame::FrameList;
use crate::size::SizeState;

/// Axis along which the output is cut into bands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Bands are columns: the source frame changes with x.
    #[default]
    Vertical,
    /// Bands are rows: the source frame changes with y.
    Horizontal,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vertical => write!(f, "Vertical"),
            Self::Horizontal => write!(f, "Horizontal"),
        }
    }
}

/// Lens and slicing parameters. Owned by the caller, read-only to the core.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintParameters {
    pub direction: Direction,
    /// Pixel extent of one band along the slicing axis.
    pub band_width_px: u32,
    /// Nominal lens density printed on the sheet.
    pub actual_lpi: f64,
    /// Measured lens density; the one used for sizing.
    pub calibrated_lpi: f64,
}

impl Default for PrintParameters {
    fn default() -> Self {
        Self {
            direction: Direction::Vertical,
            band_width_px: 1,
            actual_lpi: DEFAULT_LPI,
            calibrated_lpi: DEFAULT_LPI,
        }
    }
}

impl PrintParameters {
    pub fn validate(&self) -> Result<()> {
        if self.band_width_px < 1 {
            return Err(GratingError::InvalidParameter(
                "band width must be at least 1 pixel".into(),
            ));
        }
        for (name, lpi) in [
            ("actual LPI", self.actual_lpi),
            ("calibrated LPI", self.calibrated_lpi),
        ] {
            if !(MIN_LPI..=MAX_LPI).contains(&lpi) {
                return Err(GratingError::InvalidParameter(format!(
                    "{name} {lpi} outside [{MIN_LPI}, {MAX_LPI}]"
                )));
            }
        }
        Ok(())
    }
}

/// On-disk description of one composite job.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompositeConfig {
    pub frames: FrameList,
    pub output: PathBuf,
    /// Requested physical width in cm; 0 selects automatic sizing.
    #[serde(default)]
    pub width_cm: f64,
    #[serde(default = "default_preview_max_edge")]
    pub preview_max_edge: u32,
    #[serde(default)]
    pub print: PrintParameters,
}

fn default_preview_max_edge() -> u32 {
    DEFAULT_PREVIEW_MAX_EDGE
}

impl Default for CompositeConfig {
    fn default() -> Self {
        Self {
            frames: FrameList::new(),
            output: PathBuf::from("lenticular.png"),
            width_cm: 0.0,
            preview_max_edge: DEFAULT_PREVIEW_MAX_EDGE,
            print: PrintParameters::default(),
        }
    }
}

impl CompositeConfig {
    pub fn size_state(&self) -> SizeState {
        if self.width_cm > 0.0 {
            SizeState::ManualOverride {
                width_cm: self.width_cm,
            }
        } else {
            SizeState::Automatic
        }
    }
}
