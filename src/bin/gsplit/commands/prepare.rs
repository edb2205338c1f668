use super::plan::build_plan;
use crate::cli;
use crate::report;
use anyhow::{Context, Result};
use gsplit::config::Config;
use gsplit::core::ProcessingProfile;
use gsplit::writer::{JobTemplate, ScriptWriter};
use std::fs;

pub(crate) fn handle_prepare(mut config: Config, args: cli::PrepareArgs) -> Result<()> {
    args.sizing.apply(&mut config);

    // Command-line profile options replace the configured profile as a whole
    let profile = if args.has_profile_override() {
        ProcessingProfile::resolve(
            args.profile_config.clone(),
            args.flowcell.clone(),
            args.kit.clone(),
        )
    } else {
        ProcessingProfile::resolve(
            config.processing.config.clone(),
            config.processing.flowcell.clone(),
            config.processing.kit.clone(),
        )
    }?;

    let plan = build_plan(&config, &args.sizing)?;

    fs::create_dir_all(&args.save).with_context(|| {
        format!("Failed to create output directory '{}'", args.save.display())
    })?;

    let template = JobTemplate::from_config(&config, profile);
    let writer = ScriptWriter::new(template, args.save.clone(), args.stage.clone());
    let written = writer.write(&plan)?;

    print!("{}", report::render_plan(&plan));
    println!(
        "To submit all jobs, run the command 'sh {}'",
        written.submit_script.display()
    );
    Ok(())
}
