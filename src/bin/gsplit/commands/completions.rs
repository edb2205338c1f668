use crate::cli::{self, GSplit};
use anyhow::Result;
use clap::CommandFactory;
use std::io::Write;

pub(crate) fn handle_completions(args: cli::CompletionsArgs) -> Result<()> {
    let mut cmd = GSplit::command();
    let mut buf = Vec::<u8>::new();
    clap_complete::generate::<clap_complete::Shell, _>(
        args.shell.into(),
        &mut cmd,
        env!("CARGO_PKG_NAME"),
        &mut buf,
    );

    match std::io::stdout().write_all(&buf) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
        Err(e) => Err(e.into()),
    }
}
