//! Conversions between physical print width, output pixel size and the
//! printer resolution a lens sheet needs.
//!
//! Every lens line covers `band_width_px * frame_count` source pixels, so the
//! print must run at `band_width_px * frame_count * calibrated_lpi` DPI.

use crate::consts::CM_PER_INCH;
use crate::frame::{PhysicalSize, PixelSize};

/// Print resolution needed so each lens line receives one full band cycle.
pub fn required_dpi(frame_count: usize, band_width_px: u32, calibrated_lpi: f64) -> f64 {
    band_width_px as f64 * frame_count as f64 * calibrated_lpi
}

/// Output pixel size for a physical width, keeping the native aspect ratio.
///
/// Width and height are rounded independently (half away from zero), so the
/// result can drift from the native aspect ratio by a fraction of a pixel.
/// Returns [`PixelSize::ZERO`] for non-positive widths, zero frames or a
/// degenerate native size.
pub fn target_pixel_size(
    physical_width_cm: f64,
    native: PixelSize,
    frame_count: usize,
    band_width_px: u32,
    calibrated_lpi: f64,
) -> PixelSize {
    if !(physical_width_cm > 0.0) || frame_count == 0 || native.is_empty() {
        return PixelSize::ZERO;
    }
    let dpi = required_dpi(frame_count, band_width_px, calibrated_lpi);
    let w = (physical_width_cm / CM_PER_INCH * dpi).round();
    let h = (w * native.height as f64 / native.width as f64).round();
    PixelSize::new(to_pixels(w), to_pixels(h))
}

/// Physical print size of a pixel raster at the required DPI.
///
/// Returns [`PhysicalSize::ZERO`] if the DPI is not positive or the pixel
/// size is degenerate.
pub fn physical_size(
    pixels: PixelSize,
    frame_count: usize,
    band_width_px: u32,
    calibrated_lpi: f64,
) -> PhysicalSize {
    let dpi = required_dpi(frame_count, band_width_px, calibrated_lpi);
    if !(dpi > 0.0) || pixels.is_empty() {
        return PhysicalSize::ZERO;
    }
    let width_cm = pixels.width as f64 / dpi * CM_PER_INCH;
    let height_cm = width_cm * pixels.height as f64 / pixels.width as f64;
    PhysicalSize {
        width_cm,
        height_cm,
    }
}

fn to_pixels(v: f64) -> u32 {
    if v <= 0.0 {
        0
    } else if v >= u32::MAX as f64 {
        u32::MAX
    } else {
        v as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_pixels_saturates() {
        assert_eq!(to_pixels(-3.0), 0);
        assert_eq!(to_pixels(1e12), u32::MAX);
        assert_eq!(to_pixels(2835.0), 2835);
    }
}
