pub mod interleave;
pub mod preview;

pub use interleave::{compose_row, composite_frames, source_index};
pub use preview::{build_preview, preview_size};
