use crate::cli;
use crate::history::SubmissionHistory;
use anyhow::{Context, Result};
use tbatch::config::Config;
use tbatch::core::job::JobDescriptor;
use tbatch::core::script;
use tbatch::submit::submit;

pub(crate) async fn handle_submit(config: &Config, submit_args: cli::SubmitArgs) -> Result<()> {
    let job = build_descriptor(config, &submit_args)?;
    job.validate(&config.partition)?;

    let batch_script = script::render(&job);

    if submit_args.dry_run {
        print!("{batch_script}");
        return Ok(());
    }

    let job_id = submit(config, &batch_script, submit_args.wait).await?;

    // Load only after sbatch returns: with --wait that can be days, and
    // a stale read here would drop concurrent submissions' records.
    let mut history =
        SubmissionHistory::load().context("Failed to load tbatch submission history")?;
    history
        .record(job_id)
        .context("Failed to persist submission history")?;
    println!("Submitted batch job {job_id}");

    Ok(())
}

/// Starts from the preset descriptor and applies config and CLI
/// overrides. CLI flags win over the config file, which wins over the
/// preset defaults.
fn build_descriptor(config: &Config, args: &cli::SubmitArgs) -> Result<JobDescriptor> {
    let mut job = args.preset.descriptor();

    job.account = config.account.clone();
    if let Some(account) = &args.account {
        job.account = account.clone();
    }
    if let Some(time) = &args.time {
        job.time_limit = time.parse()?;
    }
    if let Some(gres) = &args.gres {
        job.gres = gres.parse()?;
    }
    if args.exclusive {
        job.exclusive = true;
    } else if args.no_exclusive {
        job.exclusive = false;
    }

    Ok(job)
}
