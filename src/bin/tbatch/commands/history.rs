use crate::cli;
use crate::history::{format_age, SubmissionHistory};
use anyhow::{Context, Result};
use std::time::SystemTime;

pub(crate) fn handle_history(history_args: cli::HistoryArgs) -> Result<()> {
    let history = SubmissionHistory::load().context("Failed to load tbatch submission history")?;

    if history.is_empty() {
        println!("No submissions recorded.");
        return Ok(());
    }

    let now_secs = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .context("System clock is before the Unix epoch")?
        .as_secs();

    for submission in history.last(history_args.count) {
        println!(
            "{:<10} {}",
            submission.job_id,
            format_age(now_secs, submission.submitted_at)
        );
    }
    Ok(())
}
