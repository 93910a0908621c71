use std::time::Duration;

/// Centimetres per inch.
pub const CM_PER_INCH: f64 = 2.54;

/// Width edits closer than this (in cm) to the current effective width are
/// treated as input noise and do not change the size mode.
pub const WIDTH_EPSILON_CM: f64 = 0.005;

/// Bytes per pixel in the normalized RGBA8 layout used by the compositor and
/// the scratch buffers.
pub const BYTES_PER_PIXEL: usize = 4;

/// Lowest accepted LPI (actual or calibrated).
pub const MIN_LPI: f64 = 10.0;

/// Highest accepted LPI (actual or calibrated).
pub const MAX_LPI: f64 = 1000.0;

/// Default lens density for new parameter sets.
pub const DEFAULT_LPI: f64 = 60.0;

/// Longest preview edge in pixels.
pub const DEFAULT_PREVIEW_MAX_EDGE: u32 = 400;

/// Output side length (px) above which a run is flagged as oversized.
pub const LARGE_IMAGE_THRESHOLD: u32 = 20_000;

/// Number of output rows composed between cancellation checkpoints.
pub const DEFAULT_CHECKPOINT_ROWS: u32 = 16;

/// Quiescence window for coalescing parameter-change notifications.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(50);

/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// File extensions accepted as frame sources.
pub const FRAME_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];
