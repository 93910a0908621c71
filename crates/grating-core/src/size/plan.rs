use crate::consts::{BYTES_PER_PIXEL, LARGE_IMAGE_THRESHOLD};
use crate::error::{GratingError, Result};
use crate::frame::{FrameList, PhysicalSize, PixelSize};
use crate::io::image_io::{probe_frame, FrameCodec};
use crate::pipeline::config::{Direction, PrintParameters};

use super::calculator::{physical_size, required_dpi, target_pixel_size};
use super::mode::SizeState;

/// Output geometry derived from the frames, the print parameters and the
/// size state. Never stored; recompute whenever an input changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompositionPlan {
    pub frame_count: usize,
    pub direction: Direction,
    pub band_width_px: u32,
    pub size_state: SizeState,
    pub output: PixelSize,
    pub physical: PhysicalSize,
    pub required_dpi: f64,
}

impl CompositionPlan {
    /// Derive the plan for `frame_count` frames whose first frame is `native`.
    pub fn derive(
        native: PixelSize,
        frame_count: usize,
        params: &PrintParameters,
        size_state: SizeState,
    ) -> Result<Self> {
        if frame_count == 0 {
            return Err(GratingError::EmptyFrameList);
        }
        if native.is_empty() {
            return Err(GratingError::InvalidDimensions {
                width: native.width,
                height: native.height,
            });
        }
        params.validate()?;

        let output = match size_state {
            SizeState::Automatic => native,
            SizeState::ManualOverride { width_cm } => {
                if !(width_cm > 0.0) {
                    return Err(GratingError::InvalidPrintWidth(width_cm));
                }
                target_pixel_size(
                    width_cm,
                    native,
                    frame_count,
                    params.band_width_px,
                    params.calibrated_lpi,
                )
            }
        };
        if output.is_empty() {
            return Err(GratingError::OutputTooSmall {
                width: output.width,
                height: output.height,
            });
        }

        Ok(Self {
            frame_count,
            direction: params.direction,
            band_width_px: params.band_width_px,
            size_state,
            output,
            physical: physical_size(
                output,
                frame_count,
                params.band_width_px,
                params.calibrated_lpi,
            ),
            required_dpi: required_dpi(frame_count, params.band_width_px, params.calibrated_lpi),
        })
    }

    /// Probe the first frame and derive the plan for the whole list.
    pub fn for_frames(
        frames: &FrameList,
        params: &PrintParameters,
        size_state: SizeState,
        codec: &dyn FrameCodec,
    ) -> Result<Self> {
        let first = frames.first().ok_or(GratingError::EmptyFrameList)?;
        let native = probe_frame(codec, first)?;
        Self::derive(native, frames.len(), params, size_state)
    }

    /// Required DPI rounded for display.
    pub fn required_dpi_rounded(&self) -> u64 {
        self.required_dpi.round() as u64
    }

    /// Either side above [`LARGE_IMAGE_THRESHOLD`].
    pub fn is_oversized(&self) -> bool {
        self.output.width > LARGE_IMAGE_THRESHOLD || self.output.height > LARGE_IMAGE_THRESHOLD
    }

    /// Bytes of one RGBA8 output row.
    pub fn bytes_per_row(&self) -> usize {
        self.output.width as usize * BYTES_PER_PIXEL
    }

    /// Bytes of the whole RGBA8 output raster.
    pub fn output_bytes(&self) -> usize {
        self.bytes_per_row() * self.output.height as usize
    }
}
