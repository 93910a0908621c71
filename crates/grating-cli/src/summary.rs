use std::path::Path;

use console::Style;
use grating_core::consts::LARGE_IMAGE_THRESHOLD;
use grating_core::pipeline::config::PrintParameters;
use grating_core::size::CompositionPlan;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    mode: Style,
    warning: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            mode: Style::new().green(),
            warning: Style::new().yellow().bold(),
            path: Style::new().underlined(),
        }
    }
}

/// Print the composition report shown before generating a composite.
pub fn print_plan_summary(plan: &CompositionPlan, params: &PrintParameters, output: Option<&Path>) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Lenticular Composite"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(20)));
    println!();

    if let Some(output) = output {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Output"),
            s.path.apply_to(output.display())
        );
        println!();
    }

    println!("  {}", s.header.apply_to("Frames"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Count"),
        s.value.apply_to(plan.frame_count)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Direction"),
        s.mode.apply_to(plan.direction)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Band"),
        s.value.apply_to(format!("{} px", plan.band_width_px))
    );
    println!();

    println!("  {}", s.header.apply_to("Lens"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("LPI"),
        s.value.apply_to(params.actual_lpi)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Calibrated"),
        s.value.apply_to(params.calibrated_lpi)
    );
    println!();

    println!("  {}", s.header.apply_to("Print"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Sizing"),
        s.mode.apply_to(plan.size_state)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Pixels"),
        s.value.apply_to(plan.output)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Physical"),
        s.value.apply_to(plan.physical)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("DPI"),
        s.value.apply_to(plan.required_dpi_rounded())
    );
    println!();

    if plan.is_oversized() {
        println!(
            "  {}",
            s.warning.apply_to(format!(
                "Warning: output exceeds {LARGE_IMAGE_THRESHOLD} px on one side; \
                 generation needs {:.1} GB of memory",
                plan.output_bytes() as f64 / (1024.0 * 1024.0 * 1024.0)
            ))
        );
        println!();
    }
}
