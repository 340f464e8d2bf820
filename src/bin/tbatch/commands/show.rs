use crate::cli;
use anyhow::Result;
use tbatch::config::Config;
use tbatch::core::script;

pub(crate) fn handle_show(config: &Config, show_args: cli::ShowArgs) -> Result<()> {
    let mut job = show_args.preset.descriptor();
    job.account = config.account.clone();
    print!("{}", script::render(&job));
    Ok(())
}
