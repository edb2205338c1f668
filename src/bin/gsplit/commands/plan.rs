use crate::cli;
use crate::report;
use anyhow::{bail, Context, Result};
use gsplit::config::Config;
use gsplit::core::{PlanResult, Planner};
use gsplit::scan::scan_inputs;
use gsplit::writer::check_stageable;

/// Scans the input directory and plans it under `config`.
pub(crate) fn build_plan(config: &Config, sizing: &cli::SizingArgs) -> Result<PlanResult> {
    let items = scan_inputs(&sizing.input)?;
    if items.is_empty() {
        bail!("No input files found under '{}'", sizing.input.display());
    }

    let planner = Planner::new(config.throughput.model());
    let plan = planner
        .plan(&items, sizing.groups, config.jobs.count)
        .context("Failed to plan jobs")?;
    // Reported here too, so a dry run fails where prepare would
    check_stageable(&plan.groups).context("Planned groups cannot be staged")?;
    Ok(plan)
}

pub(crate) fn handle_plan(mut config: Config, args: cli::PlanArgs) -> Result<()> {
    args.sizing.apply(&mut config);
    let plan = build_plan(&config, &args.sizing)?;

    if args.json {
        let json = serde_json::to_string_pretty(&plan).context("Failed to serialize plan")?;
        println!("{json}");
    } else {
        print!("{}", report::render_plan(&plan));
    }
    Ok(())
}
