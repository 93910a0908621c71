use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use super::{build_session, PrintArgs};
use crate::summary::print_plan_summary;

#[derive(Args)]
pub struct PlanArgs {
    /// Frame images in interleave order
    #[arg(required = true)]
    pub frames: Vec<PathBuf>,

    #[command(flatten)]
    pub print: PrintArgs,
}

pub fn run(args: &PlanArgs) -> Result<()> {
    let session = build_session(&args.frames, &args.print)?;
    let plan = session.plan()?;
    print_plan_summary(&plan, session.params(), None);
    Ok(())
}
