use crate::config::Config;
use anyhow::{anyhow, bail, Context, Result};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Hand a rendered batch script to the scheduler.
///
/// The script is fed to sbatch on stdin, so nothing has to touch the
/// filesystem. With `wait` set, sbatch blocks until the job completes
/// and exits with the job's own exit code; a failed job therefore
/// surfaces here as an error. There is no retry and no recovery — the
/// scheduler owns the job from this point on.
pub async fn submit(config: &Config, script: &str, wait: bool) -> Result<u32> {
    let mut command = Command::new(&config.sbatch_bin);
    if wait {
        command.arg("--wait");
    }
    command
        .arg("--parsable")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    tracing::debug!(sbatch = %config.sbatch_bin, wait, "Submitting batch script");

    let mut child = command
        .spawn()
        .with_context(|| format!("Failed to spawn '{}'", config.sbatch_bin))?;

    let mut stdin = child.stdin.take().context("Failed to open sbatch stdin")?;
    stdin
        .write_all(script.as_bytes())
        .await
        .context("Failed to write batch script to sbatch")?;
    drop(stdin);

    let output = child
        .wait_with_output()
        .await
        .context("Failed to wait for sbatch")?;

    if !output.status.success() {
        bail!(
            "sbatch exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    parse_job_id(&String::from_utf8_lossy(&output.stdout))
}

/// Parse the job ID out of sbatch's reply.
///
/// With `--parsable` the reply is `<id>` or `<id>;<cluster>`; without it
/// sbatch prints `Submitted batch job <id>`. Both forms are accepted.
pub fn parse_job_id(stdout: &str) -> Result<u32> {
    let line = stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .ok_or_else(|| anyhow!("Empty reply from sbatch"))?;

    let token = if let Some(rest) = line.strip_prefix("Submitted batch job") {
        rest.trim()
    } else {
        line.split(';').next().unwrap_or(line)
    };

    token
        .parse::<u32>()
        .with_context(|| format!("Unexpected reply from sbatch: {line}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_parsable_reply() {
        assert_eq!(parse_job_id("123456\n").unwrap(), 123456);
    }

    #[test]
    fn test_parse_parsable_reply_with_cluster() {
        assert_eq!(parse_job_id("123456;kebnekaise\n").unwrap(), 123456);
    }

    #[test]
    fn test_parse_verbose_reply() {
        assert_eq!(
            parse_job_id("Submitted batch job 7042\n").unwrap(),
            7042
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_job_id("").is_err());
        assert!(parse_job_id("sbatch: error: invalid partition\n").is_err());
    }
}
