use std::path::PathBuf;

use grating_core::error::{ErrorKind, GratingError};
use grating_core::frame::FrameList;
use grating_core::pipeline::config::{CompositeConfig, Direction, PrintParameters};
use grating_core::pipeline::PipelineStage;
use grating_core::size::SizeState;

#[test]
fn test_default_print_parameters() {
    let p = PrintParameters::default();
    assert_eq!(p.direction, Direction::Vertical);
    assert_eq!(p.band_width_px, 1);
    assert_eq!(p.actual_lpi, 60.0);
    assert_eq!(p.calibrated_lpi, 60.0);
    assert!(p.validate().is_ok());
}

#[test]
fn test_validate_ranges() {
    let ok = |band, actual, calibrated| {
        PrintParameters {
            band_width_px: band,
            actual_lpi: actual,
            calibrated_lpi: calibrated,
            ..Default::default()
        }
        .validate()
        .is_ok()
    };
    assert!(ok(1, 10.0, 1000.0));
    assert!(ok(50, 1000.0, 10.0));
    assert!(!ok(0, 60.0, 60.0));
    assert!(!ok(1, 9.99, 60.0));
    assert!(!ok(1, 60.0, 1000.5));
    assert!(!ok(1, f64::NAN, 60.0));
}

#[test]
fn test_direction_display_and_serde() {
    assert_eq!(Direction::Vertical.to_string(), "Vertical");
    assert_eq!(Direction::Horizontal.to_string(), "Horizontal");
    assert_eq!(
        serde_json::to_string(&Direction::Horizontal).unwrap(),
        "\"horizontal\""
    );
    let d: Direction = serde_json::from_str("\"vertical\"").unwrap();
    assert_eq!(d, Direction::Vertical);
}

#[test]
fn test_config_defaults_when_fields_missing() {
    let json = r#"{ "frames": ["a.png", "b.png"], "output": "out.tiff" }"#;
    let config: CompositeConfig = serde_json::from_str(json).unwrap();
    assert_eq!(config.frames.len(), 2);
    assert_eq!(config.output, PathBuf::from("out.tiff"));
    assert_eq!(config.print, PrintParameters::default());
    assert_eq!(config.width_cm, 0.0);
    assert_eq!(config.preview_max_edge, 400);
    assert_eq!(config.size_state(), SizeState::Automatic);
}

#[test]
fn test_config_roundtrip() {
    let config = CompositeConfig {
        frames: ["left.jpg", "right.jpg"].into_iter().collect::<FrameList>(),
        output: PathBuf::from("card.png"),
        print: PrintParameters {
            direction: Direction::Horizontal,
            band_width_px: 3,
            actual_lpi: 75.0,
            calibrated_lpi: 74.6,
        },
        width_cm: 12.5,
        preview_max_edge: 256,
    };
    let json = serde_json::to_string(&config).unwrap();
    let back: CompositeConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back.frames, config.frames);
    assert_eq!(back.print, config.print);
    assert_eq!(back.width_cm, 12.5);
    assert_eq!(back.preview_max_edge, 256);
    assert_eq!(back.size_state(), SizeState::ManualOverride { width_cm: 12.5 });
}

#[test]
fn test_negative_width_is_automatic() {
    let config = CompositeConfig {
        width_cm: -3.0,
        ..Default::default()
    };
    assert_eq!(config.size_state(), SizeState::Automatic);
}

#[test]
fn test_size_state_display() {
    assert_eq!(SizeState::Automatic.to_string(), "Automatic");
    assert_eq!(
        SizeState::ManualOverride { width_cm: 12.345 }.to_string(),
        "Manual (12.35 cm)"
    );
}

#[test]
fn test_error_kinds() {
    assert_eq!(GratingError::EmptyFrameList.kind(), ErrorKind::Input);
    assert_eq!(
        GratingError::InvalidDimensions {
            width: 0,
            height: 4
        }
        .kind(),
        ErrorKind::Input
    );
    assert_eq!(GratingError::InvalidPrintWidth(-1.0).kind(), ErrorKind::Parameter);
    assert_eq!(
        GratingError::OutputTooSmall {
            width: 0,
            height: 0
        }
        .kind(),
        ErrorKind::Parameter
    );
    assert_eq!(
        GratingError::Allocation { bytes: usize::MAX }.kind(),
        ErrorKind::Resource
    );
    assert_eq!(GratingError::PipelineBusy.kind(), ErrorKind::Resource);
}

#[test]
fn test_io_errors_convert_and_image_errors_stay_specific() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
    let err: GratingError = io.into();
    assert!(matches!(err, GratingError::Io(_)));
    assert_eq!(err.kind(), ErrorKind::Resource);

    // Decoder failures surface as the frame they came from, not a bare codec error.
    let err = grating_core::io::image_io::probe_frame(
        &grating_core::io::image_io::ImageCodec,
        std::path::Path::new("does/not/exist.png"),
    )
    .unwrap_err();
    assert!(matches!(err, GratingError::UndecodableFrame { .. }));
}

#[test]
fn test_stage_error_message() {
    let err = GratingError::Pipeline {
        stage: PipelineStage::Compositing,
        source: Box::new(GratingError::Allocation { bytes: 1024 }),
    };
    assert_eq!(err.kind(), ErrorKind::Resource);
    assert_eq!(
        err.to_string(),
        "Compositing failed: Cannot allocate 1024 bytes for the output image"
    );
    let source = std::error::Error::source(&err).unwrap();
    assert!(source.to_string().contains("1024 bytes"));
}
