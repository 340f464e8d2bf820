use crate::cli;
use anyhow::Result;
use clap::CommandFactory;
use clap_complete::{generate, Shell as CompleteShell};
use std::io;

pub(crate) fn handle_completions(completions_args: cli::CompletionsArgs) -> Result<()> {
    let mut cmd = cli::TBatch::command();
    generate(
        CompleteShell::from(completions_args.shell),
        &mut cmd,
        "tbatch",
        &mut io::stdout(),
    );
    Ok(())
}
