use clap::Parser;
use commands::handle_commands;
use gsplit::config::load_config;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod help;
mod report;

fn main() -> ExitCode {
    match real_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn real_main() -> anyhow::Result<()> {
    let args = cli::GSplit::parse();

    // RUST_LOG takes precedence over -v/-q
    let filter = EnvFilter::builder()
        .with_default_directive(args.verbose.tracing_level_filter().into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    tracing::debug!("{:?}", args);

    let config = load_config(args.config_file.as_ref())?;
    handle_commands(config, args.commands)
}
