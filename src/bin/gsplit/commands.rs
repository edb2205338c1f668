use crate::cli::Commands;
use gsplit::config::Config;

mod completions;
mod plan;
mod prepare;

pub fn handle_commands(config: Config, commands: Commands) -> anyhow::Result<()> {
    match commands {
        Commands::Plan(plan_args) => plan::handle_plan(config, plan_args),
        Commands::Prepare(prepare_args) => prepare::handle_prepare(config, prepare_args),
        Commands::Completions(completions_args) => {
            completions::handle_completions(completions_args)
        }
    }
}
