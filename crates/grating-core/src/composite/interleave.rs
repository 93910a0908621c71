use image::RgbaImage;
use rayon::prelude::*;

use crate::consts::{BYTES_PER_PIXEL, PARALLEL_PIXEL_THRESHOLD};
use crate::error::{GratingError, Result};
use crate::pipeline::config::Direction;

/// Index of the frame that owns position `position` along the slicing axis.
#[inline]
pub fn source_index(position: usize, band_width_px: u32, frame_count: usize) -> usize {
    (position / band_width_px as usize) % frame_count
}

/// Fill output row `y` from the same row of each source frame.
///
/// Every source row must already be RGBA8 at the output width. Horizontal
/// bands copy one whole source row; vertical bands copy `band_width_px`
/// pixels at a time, cycling through the sources.
pub fn compose_row<S: AsRef<[u8]>>(
    out: &mut [u8],
    sources: &[S],
    y: u32,
    direction: Direction,
    band_width_px: u32,
) -> Result<()> {
    check_row_inputs(out.len(), sources, band_width_px)?;
    let frame_count = sources.len();

    match direction {
        Direction::Horizontal => {
            let src = sources[source_index(y as usize, band_width_px, frame_count)].as_ref();
            out.copy_from_slice(src);
        }
        Direction::Vertical => {
            let band_bytes = band_width_px as usize * BYTES_PER_PIXEL;
            for (band, chunk) in out.chunks_mut(band_bytes).enumerate() {
                let start = band * band_bytes;
                let src = sources[band % frame_count].as_ref();
                chunk.copy_from_slice(&src[start..start + chunk.len()]);
            }
        }
    }
    Ok(())
}

fn check_row_inputs<S: AsRef<[u8]>>(
    row_bytes: usize,
    sources: &[S],
    band_width_px: u32,
) -> Result<()> {
    if sources.is_empty() {
        return Err(GratingError::EmptyFrameList);
    }
    if band_width_px == 0 {
        return Err(GratingError::InvalidParameter(
            "band width must be at least 1 pixel".into(),
        ));
    }
    if row_bytes % BYTES_PER_PIXEL != 0 {
        return Err(GratingError::RowLengthMismatch {
            expected: row_bytes - row_bytes % BYTES_PER_PIXEL,
            actual: row_bytes,
        });
    }
    if let Some(bad) = sources.iter().find(|s| s.as_ref().len() != row_bytes) {
        return Err(GratingError::RowLengthMismatch {
            expected: row_bytes,
            actual: bad.as_ref().len(),
        });
    }
    Ok(())
}

/// Interleave whole in-memory frames in one pass.
///
/// All frames must share the dimensions of the first one.
pub fn composite_frames(
    frames: &[RgbaImage],
    direction: Direction,
    band_width_px: u32,
) -> Result<RgbaImage> {
    let first = frames.first().ok_or(GratingError::EmptyFrameList)?;
    let (w, h) = first.dimensions();
    if w == 0 || h == 0 {
        return Err(GratingError::InvalidDimensions {
            width: w,
            height: h,
        });
    }
    if let Some(bad) = frames.iter().find(|f| f.dimensions() != (w, h)) {
        let (bw, bh) = bad.dimensions();
        return Err(GratingError::InvalidDimensions {
            width: bw,
            height: bh,
        });
    }
    if band_width_px == 0 {
        return Err(GratingError::InvalidParameter(
            "band width must be at least 1 pixel".into(),
        ));
    }

    let row_bytes = w as usize * BYTES_PER_PIXEL;
    let mut out = RgbaImage::new(w, h);
    let fill = |(y, row): (usize, &mut [u8])| -> Result<()> {
        let start = y * row_bytes;
        let sources: Vec<&[u8]> = frames
            .iter()
            .map(|f| &f.as_raw()[start..start + row_bytes])
            .collect();
        compose_row(row, &sources, y as u32, direction, band_width_px)
    };

    if (w as usize) * (h as usize) >= PARALLEL_PIXEL_THRESHOLD {
        out.par_chunks_mut(row_bytes).enumerate().try_for_each(fill)?;
    } else {
        out.chunks_mut(row_bytes).enumerate().try_for_each(fill)?;
    }
    Ok(out)
}
