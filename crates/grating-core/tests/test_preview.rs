mod common;

use grating_core::composite::{build_preview, preview_size};
use grating_core::error::GratingError;
use grating_core::frame::{FrameList, PixelSize};
use grating_core::io::image_io::ImageCodec;
use grating_core::pipeline::config::{Direction, PrintParameters};
use grating_core::size::{CompositionPlan, SizeState};

use common::{solid_frame, write_frames};

fn plan_for(frames: &FrameList, direction: Direction, band_width_px: u32) -> CompositionPlan {
    let params = PrintParameters {
        direction,
        band_width_px,
        ..Default::default()
    };
    CompositionPlan::for_frames(frames, &params, SizeState::Automatic, &ImageCodec).unwrap()
}

#[test]
fn test_preview_size_fits_box() {
    assert_eq!(preview_size(PixelSize::new(4000, 3000), 400), PixelSize::new(400, 300));
    assert_eq!(preview_size(PixelSize::new(300, 2000), 400), PixelSize::new(60, 400));
    assert_eq!(preview_size(PixelSize::new(100, 50), 400), PixelSize::new(400, 200));
    assert_eq!(preview_size(PixelSize::new(10_000, 1), 400), PixelSize::new(400, 1));
}

#[test]
fn test_preview_size_degenerate() {
    assert_eq!(preview_size(PixelSize::ZERO, 400), PixelSize::ZERO);
    assert_eq!(preview_size(PixelSize::new(100, 100), 0), PixelSize::ZERO);
}

#[test]
fn test_preview_vertical_bands() {
    let dir = tempfile::tempdir().unwrap();
    let frames = write_frames(
        dir.path(),
        &[
            solid_frame(40, 30, [200, 0, 0, 255]),
            solid_frame(40, 30, [0, 200, 0, 255]),
        ],
    );
    let plan = plan_for(&frames, Direction::Vertical, 5);
    let preview = build_preview(&frames, &plan, &ImageCodec, 40).unwrap();
    assert_eq!(preview.dimensions(), (40, 30));
    for (x, _, p) in preview.enumerate_pixels() {
        let expected = if (x / 5) % 2 == 0 {
            [200, 0, 0, 255]
        } else {
            [0, 200, 0, 255]
        };
        assert_eq!(p.0, expected);
    }
}

#[test]
fn test_preview_horizontal_bands() {
    let dir = tempfile::tempdir().unwrap();
    let frames = write_frames(
        dir.path(),
        &[
            solid_frame(20, 20, [1, 1, 1, 255]),
            solid_frame(20, 20, [2, 2, 2, 255]),
            solid_frame(20, 20, [3, 3, 3, 255]),
        ],
    );
    let plan = plan_for(&frames, Direction::Horizontal, 2);
    let preview = build_preview(&frames, &plan, &ImageCodec, 20).unwrap();
    for (_, y, p) in preview.enumerate_pixels() {
        assert_eq!(p[0] as u32, (y / 2) % 3 + 1);
    }
}

#[test]
fn test_preview_scales_frames_to_common_size() {
    let dir = tempfile::tempdir().unwrap();
    let frames = write_frames(
        dir.path(),
        &[
            solid_frame(800, 400, [10, 10, 10, 255]),
            solid_frame(300, 300, [20, 20, 20, 255]),
        ],
    );
    let plan = plan_for(&frames, Direction::Vertical, 1);
    let preview = build_preview(&frames, &plan, &ImageCodec, 400).unwrap();
    assert_eq!(preview.dimensions(), (400, 200));
}

#[test]
fn test_preview_undecodable_frame_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut frames = write_frames(dir.path(), &[solid_frame(8, 8, [0, 0, 0, 255])]);
    let bad = dir.path().join("broken.png");
    std::fs::write(&bad, b"not a png").unwrap();
    let plan = plan_for(&frames, Direction::Vertical, 1);
    frames.import([bad], Default::default());

    let err = build_preview(&frames, &plan, &ImageCodec, 8).unwrap_err();
    assert!(matches!(err, GratingError::UndecodableFrame { .. }));
}

#[test]
fn test_preview_empty_list() {
    let plan = CompositionPlan::derive(
        PixelSize::new(8, 8),
        1,
        &PrintParameters::default(),
        SizeState::Automatic,
    )
    .unwrap();
    let err = build_preview(&FrameList::new(), &plan, &ImageCodec, 8).unwrap_err();
    assert!(matches!(err, GratingError::EmptyFrameList));
}
