use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use grating_core::frame::check_frame_extension;
use grating_core::io::image_io::{probe_frame, ImageCodec};

#[derive(Args)]
pub struct InfoArgs {
    /// Frame images (PNG or JPEG)
    #[arg(required = true)]
    pub frames: Vec<PathBuf>,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let mut sizes = Vec::with_capacity(args.frames.len());
    for path in &args.frames {
        check_frame_extension(path)?;
        let size = probe_frame(&ImageCodec, path)?;
        println!("{:<12} {}", size.to_string(), path.display());
        sizes.push(size);
    }

    let first = sizes[0];
    let mismatched = sizes.iter().filter(|&&s| s != first).count();
    println!();
    println!("Frames:      {}", sizes.len());
    println!("Output size: {} (first frame)", first);
    if mismatched > 0 {
        println!(
            "Mismatched:  {} frame(s) will be resized to {}",
            mismatched, first
        );
    }

    Ok(())
}
