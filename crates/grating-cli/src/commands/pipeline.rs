use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use grating_core::io::image_io::ImageCodec;
use grating_core::pipeline::config::CompositeConfig;
use grating_core::pipeline::{
    run_composite_reported, PipelineOutcome, PipelineStage, ProgressReporter,
};
use grating_core::size::CompositionPlan;
use indicatif::{ProgressBar, ProgressStyle};

use super::{build_session, PrintArgs};
use crate::summary::print_plan_summary;

#[derive(Args)]
pub struct RunArgs {
    /// Frame images in interleave order
    #[arg(required_unless_present = "config")]
    pub frames: Vec<PathBuf>,

    /// Composite config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub print: PrintArgs,

    /// Output file path (.png or .tiff)
    #[arg(short, long, default_value = "lenticular.png")]
    pub output: PathBuf,
}

/// Drives an indicatif bar from pipeline progress.
struct BarReporter {
    bar: ProgressBar,
}

impl ProgressReporter for BarReporter {
    fn begin_stage(&self, stage: PipelineStage, _total_items: Option<usize>) {
        self.bar.set_message(stage.to_string());
    }

    fn set_percent(&self, percent: u8) {
        self.bar.set_position(percent as u64);
    }
}

pub fn run(args: &RunArgs) -> Result<()> {
    let config = if let Some(ref config_path) = args.config {
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        toml::from_str::<CompositeConfig>(&contents).context("Invalid composite config")?
    } else {
        build_session(&args.frames, &args.print)?.config(&args.output)
    };

    let plan = CompositionPlan::for_frames(
        &config.frames,
        &config.print,
        config.size_state(),
        &ImageCodec,
    )?;
    print_plan_summary(&plan, &config.print, Some(&config.output));

    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{msg:20} [{bar:40}] {pos}%")?
            .progress_chars("=> "),
    );
    let reporter = BarReporter { bar };

    let outcome = run_composite_reported(&config, Arc::new(ImageCodec), &reporter)?;

    match outcome {
        PipelineOutcome::Completed { output, .. } => {
            reporter.bar.finish_with_message("Done");
            println!("\nOutput saved to {}", output.display());
        }
        PipelineOutcome::Cancelled => {
            reporter.bar.abandon_with_message("Cancelled");
        }
    }

    Ok(())
}
