pub mod config;
pub mod info;
pub mod pipeline;
pub mod plan;
pub mod preview;

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Args, ValueEnum};
use grating_core::frame::ImportMode;
use grating_core::pipeline::config::{Direction, PrintParameters};
use grating_core::session::Session;
use grating_core::size::WidthEdit;
use tracing::debug;

#[derive(Clone, Copy, ValueEnum)]
pub enum DirectionArg {
    Vertical,
    Horizontal,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Vertical => Direction::Vertical,
            DirectionArg::Horizontal => Direction::Horizontal,
        }
    }
}

/// Lens and sizing flags shared by `plan`, `preview` and `run`.
#[derive(Args)]
pub struct PrintArgs {
    /// Slicing direction
    #[arg(long, value_enum, default_value = "vertical")]
    pub direction: DirectionArg,

    /// Band width in pixels
    #[arg(long, default_value = "1")]
    pub band_width: u32,

    /// Lens density printed on the sheet (lines per inch)
    #[arg(long, default_value = "60")]
    pub lpi: f64,

    /// Measured lens density used for sizing; defaults to --lpi
    #[arg(long)]
    pub calibrated_lpi: Option<f64>,

    /// Physical print width in cm (0 = use the first frame's native size)
    #[arg(long, default_value = "0")]
    pub width_cm: f64,
}

impl PrintArgs {
    pub fn params(&self) -> PrintParameters {
        PrintParameters {
            direction: self.direction.into(),
            band_width_px: self.band_width,
            actual_lpi: self.lpi,
            calibrated_lpi: self.calibrated_lpi.unwrap_or(self.lpi),
        }
    }
}

/// Load frames and print flags into a session, pinning the requested width.
pub fn build_session(frames: &[PathBuf], print: &PrintArgs) -> Result<Session> {
    if frames.is_empty() {
        bail!("No frames given");
    }
    let mut session = Session::default().with_params(print.params())?;
    session.import(frames.to_vec(), ImportMode::Replace)?;

    if print.width_cm > 0.0 {
        match session.edit_width(print.width_cm)? {
            WidthEdit::Pending(pending) => {
                debug!(
                    width_cm = pending.width_cm,
                    target = %pending.target,
                    "Pinning print width"
                );
                session.accept_width(pending);
            }
            WidthEdit::Unchanged { effective_width_cm } => {
                debug!(effective_width_cm, "Requested width matches native size");
            }
            WidthEdit::Reset(_) => {}
        }
    }
    Ok(session)
}
