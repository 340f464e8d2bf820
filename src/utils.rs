use anyhow::{anyhow, Context, Result};
use std::time::Duration;

/// Parse a wall-clock limit string into a Duration.
///
/// Supported formats:
/// - `"D-HH:MM:SS"` — days-hours:minutes:seconds (the Slurm long form)
/// - `"HH:MM:SS"` — hours:minutes:seconds
/// - `"MM:SS"` — minutes:seconds
/// - `"MM"` — minutes
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use tbatch::utils::parse_time_limit;
///
/// assert_eq!(parse_time_limit("30").unwrap(), Duration::from_secs(1800));
/// assert_eq!(parse_time_limit("30:45").unwrap(), Duration::from_secs(1845));
/// assert_eq!(parse_time_limit("2:30:45").unwrap(), Duration::from_secs(9045));
/// assert_eq!(parse_time_limit("7-00:00:00").unwrap(), Duration::from_secs(604800));
/// ```
pub fn parse_time_limit(time_str: &str) -> Result<Duration> {
    let time_str = time_str.trim();

    let (days, clock_str) = match time_str.split_once('-') {
        Some((days, rest)) => {
            let days = days
                .parse::<u64>()
                .context("Invalid day count in D-HH:MM:SS format")?;
            (days, rest)
        }
        None => (0, time_str),
    };

    let parts: Vec<&str> = clock_str.split(':').collect();

    let clock_secs = match parts.len() {
        1 if days == 0 => {
            // Minutes as a single number
            let val = clock_str
                .parse::<u64>()
                .context("Invalid time format. Expected number of minutes")?;
            val * 60
        }
        2 if days == 0 => {
            // MM:SS
            let minutes = parts[0]
                .parse::<u64>()
                .context("Invalid minutes in MM:SS format")?;
            let seconds = parts[1]
                .parse::<u64>()
                .context("Invalid seconds in MM:SS format")?;
            minutes * 60 + seconds
        }
        3 => {
            // HH:MM:SS
            let hours = parts[0]
                .parse::<u64>()
                .context("Invalid hours in HH:MM:SS format")?;
            let minutes = parts[1]
                .parse::<u64>()
                .context("Invalid minutes in HH:MM:SS format")?;
            let seconds = parts[2]
                .parse::<u64>()
                .context("Invalid seconds in HH:MM:SS format")?;
            hours * 3600 + minutes * 60 + seconds
        }
        _ => {
            return Err(anyhow!(
                "Invalid time format. Expected formats: D-HH:MM:SS, HH:MM:SS, MM:SS, or MM"
            ))
        }
    };

    let total_secs = days
        .checked_mul(86400)
        .and_then(|day_secs| day_secs.checked_add(clock_secs))
        .ok_or_else(|| anyhow!("Invalid time format. Wall-clock limit is too large: {time_str}"))?;

    Ok(Duration::from_secs(total_secs))
}

/// Format a duration in the Slurm long form `D-HH:MM:SS`.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use tbatch::utils::format_slurm_duration;
///
/// assert_eq!(format_slurm_duration(Duration::from_secs(604800)), "7-00:00:00");
/// assert_eq!(format_slurm_duration(Duration::from_secs(9045)), "0-02:30:45");
/// ```
pub fn format_slurm_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let days = total_secs / 86400;
    let hours = (total_secs % 86400) / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    format!("{days}-{hours:02}:{minutes:02}:{seconds:02}")
}
