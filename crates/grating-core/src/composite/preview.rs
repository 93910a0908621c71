use image::imageops::{self, FilterType};
use image::RgbaImage;
use rayon::prelude::*;
use tracing::debug;

use crate::error::{GratingError, Result};
use crate::frame::{FrameList, PixelSize};
use crate::io::image_io::{load_frame, FrameCodec};
use crate::size::CompositionPlan;

use super::interleave::composite_frames;

/// Size of the preview raster: the plan's output scaled into a
/// `max_edge` x `max_edge` box.
pub fn preview_size(output: PixelSize, max_edge: u32) -> PixelSize {
    output.fit_within(max_edge)
}

/// Build a small composite for interactive feedback.
///
/// Each frame is decoded and stretched to the same thumbnail size, so the
/// preview shows the band layout but not the full-resolution band widths.
pub fn build_preview(
    frames: &FrameList,
    plan: &CompositionPlan,
    codec: &dyn FrameCodec,
    max_edge: u32,
) -> Result<RgbaImage> {
    if frames.is_empty() {
        return Err(GratingError::EmptyFrameList);
    }
    let target = preview_size(plan.output, max_edge);
    if target.is_empty() {
        return Err(GratingError::OutputTooSmall {
            width: target.width,
            height: target.height,
        });
    }
    debug!(frames = frames.len(), size = %target, "Building preview");

    let thumbnails: Vec<RgbaImage> = frames
        .paths()
        .par_iter()
        .map(|path| {
            let frame = load_frame(codec, path)?;
            if frame.dimensions() == (target.width, target.height) {
                Ok(frame)
            } else {
                Ok(imageops::resize(
                    &frame,
                    target.width,
                    target.height,
                    FilterType::Triangle,
                ))
            }
        })
        .collect::<Result<_>>()?;

    composite_frames(&thumbnails, plan.direction, plan.band_width_px)
}
