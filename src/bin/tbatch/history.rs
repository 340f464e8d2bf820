use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::SystemTime;
use tbatch::core::get_data_dir;

const HISTORY_FILENAME: &str = "tbatch_history.json";
const MAX_ENTRIES: usize = 256;

/// One scheduler hand-off: the job ID sbatch replied with and when the
/// submission happened (seconds since the Unix epoch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub job_id: u32,
    pub submitted_at: u64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct HistoryData {
    submissions: Vec<Submission>,
}

/// Past submissions, newest last, capped at `MAX_ENTRIES`.
#[derive(Debug)]
pub struct SubmissionHistory {
    path: PathBuf,
    data: HistoryData,
}

impl SubmissionHistory {
    pub fn load() -> Result<Self> {
        let data_dir = get_data_dir().context("Failed to locate tbatch data directory")?;
        Self::load_from_dir(data_dir)
    }

    pub(crate) fn load_from_dir(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create data directory at {}", dir.display()))?;
        let path = dir.join(HISTORY_FILENAME);

        let data = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => HistoryData::default(),
            Ok(contents) => serde_json::from_str(&contents).with_context(|| {
                format!("Failed to parse submission history at {}", path.display())
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HistoryData::default(),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read submission history at {}", path.display())
                })
            }
        };

        Ok(Self { path, data })
    }

    pub fn is_empty(&self) -> bool {
        self.data.submissions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.submissions.len()
    }

    /// The last `n` submissions, oldest first.
    pub fn last(&self, n: usize) -> &[Submission] {
        let len = self.data.submissions.len();
        &self.data.submissions[len.saturating_sub(n)..]
    }

    pub fn record(&mut self, job_id: u32) -> Result<()> {
        let submitted_at = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .context("System clock is before the Unix epoch")?
            .as_secs();
        self.record_at(job_id, submitted_at)
    }

    pub(crate) fn record_at(&mut self, job_id: u32, submitted_at: u64) -> Result<()> {
        self.data.submissions.push(Submission {
            job_id,
            submitted_at,
        });
        if self.data.submissions.len() > MAX_ENTRIES {
            let excess = self.data.submissions.len() - MAX_ENTRIES;
            self.data.submissions.drain(0..excess);
        }

        let serialized =
            serde_json::to_string(&self.data).context("Failed to serialize submission history")?;
        fs::write(&self.path, serialized).with_context(|| {
            format!(
                "Failed to write submission history to {}",
                self.path.display()
            )
        })
    }
}

/// Rough age of a submission for display ("3h ago").
pub fn format_age(now_secs: u64, submitted_at: u64) -> String {
    let elapsed = now_secs.saturating_sub(submitted_at);
    match elapsed {
        0..=59 => "just now".to_string(),
        60..=3599 => format!("{}m ago", elapsed / 60),
        3600..=86399 => format!("{}h ago", elapsed / 3600),
        _ => format!("{}d ago", elapsed / 86400),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_records_persist_across_loads() {
        let dir = tempdir().expect("tempdir");
        let mut history =
            SubmissionHistory::load_from_dir(dir.path().to_path_buf()).expect("history");
        history.record_at(100, 1_700_000_000).expect("record");
        history.record_at(101, 1_700_000_060).expect("record");

        let reloaded =
            SubmissionHistory::load_from_dir(dir.path().to_path_buf()).expect("history");
        assert_eq!(
            reloaded.last(10),
            &[
                Submission {
                    job_id: 100,
                    submitted_at: 1_700_000_000
                },
                Submission {
                    job_id: 101,
                    submitted_at: 1_700_000_060
                },
            ]
        );
    }

    #[test]
    fn test_record_stamps_submission_time() {
        let dir = tempdir().expect("tempdir");
        let mut history =
            SubmissionHistory::load_from_dir(dir.path().to_path_buf()).expect("history");
        let before = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .expect("clock")
            .as_secs();
        history.record(7).expect("record");
        let submission = history.last(1)[0];
        assert_eq!(submission.job_id, 7);
        assert!(submission.submitted_at >= before);
    }

    #[test]
    fn test_last_caps_at_available_entries() {
        let dir = tempdir().expect("tempdir");
        let mut history =
            SubmissionHistory::load_from_dir(dir.path().to_path_buf()).expect("history");
        history.record_at(7, 0).expect("record");
        assert_eq!(history.last(5).len(), 1);
        assert!(history.last(0).is_empty());
    }

    #[test]
    fn test_history_is_bounded() {
        let dir = tempdir().expect("tempdir");
        let mut history =
            SubmissionHistory::load_from_dir(dir.path().to_path_buf()).expect("history");
        for id in 0..(MAX_ENTRIES as u32 + 10) {
            history.record_at(id, u64::from(id)).expect("record");
        }
        assert_eq!(history.len(), MAX_ENTRIES);
        assert_eq!(history.last(1)[0].job_id, MAX_ENTRIES as u32 + 9);
    }

    #[test]
    fn test_format_age_buckets() {
        assert_eq!(format_age(1000, 1000), "just now");
        assert_eq!(format_age(1000, 941), "just now");
        assert_eq!(format_age(10_000, 9_000), "16m ago");
        assert_eq!(format_age(90_000, 3_600), "1d ago");
        assert_eq!(format_age(7_200, 0), "2h ago");
        // A clock that moved backwards still renders something sane
        assert_eq!(format_age(0, 1000), "just now");
    }
}
