use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use grating_core::consts::DEFAULT_PREVIEW_MAX_EDGE;
use grating_core::io::image_io::save_image;

use super::{build_session, PrintArgs};

#[derive(Args)]
pub struct PreviewArgs {
    /// Frame images in interleave order
    #[arg(required = true)]
    pub frames: Vec<PathBuf>,

    #[command(flatten)]
    pub print: PrintArgs,

    /// Longest edge of the preview in pixels
    #[arg(long, default_value_t = DEFAULT_PREVIEW_MAX_EDGE)]
    pub max_edge: u32,

    /// Output file path
    #[arg(short, long, default_value = "preview.png")]
    pub output: PathBuf,
}

pub fn run(args: &PreviewArgs) -> Result<()> {
    let session = build_session(&args.frames, &args.print)?;
    let plan = session.plan()?;
    let preview = session
        .preview(args.max_edge)
        .context("Failed to build preview")?;

    save_image(&preview, &args.output)?;
    println!(
        "Preview {}x{} of {} output saved to {}",
        preview.width(),
        preview.height(),
        plan.output,
        args.output.display()
    );
    Ok(())
}
