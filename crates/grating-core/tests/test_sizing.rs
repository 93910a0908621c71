use approx::assert_relative_eq;

use grating_core::error::{ErrorKind, GratingError};
use grating_core::frame::{PhysicalSize, PixelSize};
use grating_core::pipeline::config::{Direction, PrintParameters};
use grating_core::size::{
    physical_size, required_dpi, target_pixel_size, CompositionPlan, SizeState,
};

fn params(band_width_px: u32, calibrated_lpi: f64) -> PrintParameters {
    PrintParameters {
        direction: Direction::Vertical,
        band_width_px,
        actual_lpi: calibrated_lpi,
        calibrated_lpi,
    }
}

// ---------------------------------------------------------------------------
// required_dpi
// ---------------------------------------------------------------------------

#[test]
fn test_required_dpi_is_exact_product() {
    assert_eq!(required_dpi(2, 4, 90.0), 720.0);
    assert_eq!(required_dpi(3, 1, 60.5), 181.5);
    assert_eq!(required_dpi(7, 3, 101.25), 7.0 * 3.0 * 101.25);
}

#[test]
fn test_required_dpi_zero_frames() {
    assert_eq!(required_dpi(0, 4, 90.0), 0.0);
}

// ---------------------------------------------------------------------------
// target_pixel_size
// ---------------------------------------------------------------------------

#[test]
fn test_target_pixel_size_worked_example() {
    // 10 cm at 720 DPI: 10 / 2.54 * 720 = 2834.645... -> 2835
    let native = PixelSize::new(4000, 3000);
    let size = target_pixel_size(10.0, native, 2, 4, 90.0);
    assert_eq!(size.width, 2835);
    // Height follows the rounded width: 2835 * 0.75 = 2126.25 -> 2126
    assert_eq!(size.height, 2126);
}

#[test]
fn test_target_pixel_size_non_positive_width() {
    let native = PixelSize::new(800, 600);
    assert_eq!(target_pixel_size(0.0, native, 2, 4, 90.0), PixelSize::ZERO);
    assert_eq!(target_pixel_size(-5.0, native, 2, 4, 90.0), PixelSize::ZERO);
    assert_eq!(target_pixel_size(f64::NAN, native, 2, 4, 90.0), PixelSize::ZERO);
}

#[test]
fn test_target_pixel_size_no_frames() {
    let native = PixelSize::new(800, 600);
    assert_eq!(target_pixel_size(10.0, native, 0, 4, 90.0), PixelSize::ZERO);
}

#[test]
fn test_target_pixel_size_degenerate_native() {
    assert_eq!(
        target_pixel_size(10.0, PixelSize::new(0, 600), 2, 4, 90.0),
        PixelSize::ZERO
    );
    assert_eq!(
        target_pixel_size(10.0, PixelSize::new(800, 0), 2, 4, 90.0),
        PixelSize::ZERO
    );
}

#[test]
fn test_target_pixel_size_keeps_aspect_within_a_pixel() {
    let native = PixelSize::new(1920, 1080);
    for width_cm in [3.3, 7.0, 12.75, 21.0] {
        let size = target_pixel_size(width_cm, native, 3, 2, 75.0);
        let expected_h = size.width as f64 * 1080.0 / 1920.0;
        assert!((size.height as f64 - expected_h).abs() <= 0.5);
    }
}

// ---------------------------------------------------------------------------
// physical_size
// ---------------------------------------------------------------------------

#[test]
fn test_physical_size_worked_example() {
    let size = physical_size(PixelSize::new(720, 360), 2, 4, 90.0);
    assert_relative_eq!(size.width_cm, 2.54, epsilon = 1e-12);
    assert_relative_eq!(size.height_cm, 1.27, epsilon = 1e-12);
}

#[test]
fn test_physical_size_zero_dpi() {
    assert_eq!(
        physical_size(PixelSize::new(720, 360), 0, 4, 90.0),
        PhysicalSize::ZERO
    );
    assert_eq!(
        physical_size(PixelSize::new(720, 360), 2, 0, 90.0),
        PhysicalSize::ZERO
    );
}

#[test]
fn test_physical_size_degenerate_pixels() {
    assert_eq!(
        physical_size(PixelSize::new(0, 360), 2, 4, 90.0),
        PhysicalSize::ZERO
    );
}

#[test]
fn test_width_round_trip_within_tolerance() {
    let native = PixelSize::new(3000, 2000);
    for (frames, band, lpi) in [(2, 4, 90.0), (3, 2, 60.0), (5, 1, 40.0), (8, 3, 101.6)] {
        for width_cm in [0.5, 1.0, 2.54, 9.99, 10.0, 33.3, 120.0] {
            let px = target_pixel_size(width_cm, native, frames, band, lpi);
            let back = physical_size(px, frames, band, lpi).width_cm;
            assert!(
                (back - width_cm).abs() < 0.01,
                "{width_cm} cm -> {px} -> {back} cm (K={frames}, s={band}, L={lpi})"
            );
        }
    }
}

// ---------------------------------------------------------------------------
// CompositionPlan
// ---------------------------------------------------------------------------

#[test]
fn test_plan_automatic_uses_native_pixels() {
    let native = PixelSize::new(1200, 800);
    let plan = CompositionPlan::derive(native, 2, &params(4, 90.0), SizeState::Automatic).unwrap();
    assert_eq!(plan.output, native);
    assert_eq!(plan.required_dpi, 720.0);
    assert_relative_eq!(plan.physical.width_cm, 1200.0 / 720.0 * 2.54, epsilon = 1e-12);
    assert_eq!(plan.frame_count, 2);
    assert_eq!(plan.band_width_px, 4);
}

#[test]
fn test_plan_manual_override_uses_target_pixels() {
    let native = PixelSize::new(4000, 3000);
    let state = SizeState::ManualOverride { width_cm: 10.0 };
    let plan = CompositionPlan::derive(native, 2, &params(4, 90.0), state).unwrap();
    assert_eq!(plan.output, PixelSize::new(2835, 2126));
    assert_eq!(plan.required_dpi_rounded(), 720);
    assert_eq!(plan.bytes_per_row(), 2835 * 4);
    assert_eq!(plan.output_bytes(), 2835 * 4 * 2126);
}

#[test]
fn test_plan_rejects_output_below_one_pixel() {
    let native = PixelSize::new(4000, 3000);
    let state = SizeState::ManualOverride { width_cm: 0.0001 };
    let err = CompositionPlan::derive(native, 2, &params(4, 90.0), state).unwrap_err();
    assert!(matches!(err, GratingError::OutputTooSmall { .. }));
    assert_eq!(err.kind(), ErrorKind::Parameter);
}

#[test]
fn test_plan_rejects_non_positive_pin() {
    let native = PixelSize::new(4000, 3000);
    let state = SizeState::ManualOverride { width_cm: -1.0 };
    let err = CompositionPlan::derive(native, 2, &params(4, 90.0), state).unwrap_err();
    assert!(matches!(err, GratingError::InvalidPrintWidth(_)));
    assert_eq!(err.kind(), ErrorKind::Parameter);
}

#[test]
fn test_plan_rejects_empty_inputs() {
    let err = CompositionPlan::derive(
        PixelSize::new(10, 10),
        0,
        &params(1, 60.0),
        SizeState::Automatic,
    )
    .unwrap_err();
    assert!(matches!(err, GratingError::EmptyFrameList));

    let err = CompositionPlan::derive(PixelSize::ZERO, 2, &params(1, 60.0), SizeState::Automatic)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Input);
}

#[test]
fn test_plan_oversized_flag() {
    let plan = CompositionPlan::derive(
        PixelSize::new(20_001, 100),
        2,
        &params(1, 60.0),
        SizeState::Automatic,
    )
    .unwrap();
    assert!(plan.is_oversized());

    let plan = CompositionPlan::derive(
        PixelSize::new(20_000, 20_000),
        2,
        &params(1, 60.0),
        SizeState::Automatic,
    )
    .unwrap();
    assert!(!plan.is_oversized());
}
