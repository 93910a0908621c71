pub mod calculator;
pub mod mode;
pub mod plan;

pub use calculator::{physical_size, required_dpi, target_pixel_size};
pub use mode::{PendingOverride, SizeModeController, SizeState, Transition, WidthEdit};
pub use plan::CompositionPlan;
