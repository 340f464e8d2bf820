use crate::core::command::TrainCommand;
use crate::core::gres::{GresRequest, Partition};
use crate::core::modules::{Backend, EnvModule};
use crate::utils::{format_slurm_duration, parse_time_limit};
use anyhow::{bail, Result};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Wall-clock limit for a job, displayed in the Slurm long form
/// (`7-00:00:00`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeLimit(Duration);

impl TimeLimit {
    pub fn from_days(days: u64) -> Self {
        Self(Duration::from_secs(days.saturating_mul(86400)))
    }

    pub fn as_duration(&self) -> Duration {
        self.0
    }
}

impl fmt::Display for TimeLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_slurm_duration(self.0))
    }
}

impl FromStr for TimeLimit {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_time_limit(s).map(Self)
    }
}

/// A fully-specified batch execution request: resource envelope,
/// environment setup, and the one command to run.
///
/// Descriptors are one-shot values. They are built, validated, rendered
/// to a batch script, handed to the scheduler, and discarded; nothing
/// here mutates after submission.
#[derive(Debug, Clone)]
pub struct JobDescriptor {
    /// Billing/allocation account
    pub account: String,
    /// Optional scheduler job name
    pub job_name: Option<String>,
    /// Number of scheduler tasks
    pub tasks: u32,
    /// Reserve the whole node for this job
    pub exclusive: bool,
    /// Wall-clock limit
    pub time_limit: TimeLimit,
    /// Stderr capture template, `%J` is the scheduler job ID
    pub stderr_path: String,
    /// Stdout capture template, `%J` is the scheduler job ID
    pub stdout_path: String,
    /// GPU model and count
    pub gres: GresRequest,
    /// Toolchain modules, loaded in declared order
    pub modules: Vec<EnvModule>,
    /// Deep-learning backend exported for the trainer
    pub backend: Backend,
    /// The training invocation
    pub command: TrainCommand,
}

impl JobDescriptor {
    pub fn builder(
        account: impl Into<String>,
        gres: GresRequest,
        command: TrainCommand,
    ) -> JobDescriptorBuilder {
        JobDescriptorBuilder::new(account, gres, command)
    }

    /// Checks the descriptor against the target partition before
    /// anything is handed to the scheduler.
    pub fn validate(&self, partition: &Partition) -> Result<()> {
        if self.account.trim().is_empty() {
            bail!("Account cannot be empty");
        }
        // These fields land verbatim on #SBATCH lines; a newline or a
        // leading '#' would smuggle extra directives into the script.
        let mut directive_fields = vec![
            ("account", self.account.as_str()),
            ("stdout path", self.stdout_path.as_str()),
            ("stderr path", self.stderr_path.as_str()),
        ];
        if let Some(name) = &self.job_name {
            directive_fields.push(("job name", name.as_str()));
        }
        for (label, value) in directive_fields {
            if value.chars().any(char::is_control) {
                bail!("The {label} must not contain control characters: {value:?}");
            }
            if value.trim_start().starts_with('#') {
                bail!("The {label} must not start with '#': {value:?}");
            }
        }
        if self.tasks == 0 {
            bail!("Task count must be at least 1");
        }
        if self.gres.count == 0 {
            bail!("GPU count must be at least 1");
        }
        if !partition.can_satisfy(&self.gres) {
            bail!(
                "GPU request '{}' cannot be satisfied by partition '{}'",
                self.gres,
                partition.name
            );
        }
        for (label, path) in [("stdout", &self.stdout_path), ("stderr", &self.stderr_path)] {
            if !path.contains("%J") && !path.contains("%j") {
                bail!("The {label} path template must contain a job-ID placeholder: {path}");
            }
        }
        if self.modules.is_empty() {
            bail!("At least one environment module must be loaded");
        }
        Ok(())
    }
}

pub struct JobDescriptorBuilder {
    account: String,
    job_name: Option<String>,
    tasks: u32,
    exclusive: bool,
    time_limit: TimeLimit,
    stderr_path: String,
    stdout_path: String,
    gres: GresRequest,
    modules: Vec<EnvModule>,
    backend: Backend,
    command: TrainCommand,
}

impl JobDescriptorBuilder {
    pub fn new(account: impl Into<String>, gres: GresRequest, command: TrainCommand) -> Self {
        Self {
            account: account.into(),
            job_name: None,
            tasks: 1,
            exclusive: false,
            time_limit: TimeLimit::from_days(7),
            stderr_path: "job.%J.err".to_string(),
            stdout_path: "job.%J.out".to_string(),
            gres,
            modules: Vec::new(),
            backend: Backend::Tensorflow,
            command,
        }
    }

    pub fn job_name(mut self, name: impl Into<String>) -> Self {
        self.job_name = Some(name.into());
        self
    }

    pub fn tasks(mut self, tasks: u32) -> Self {
        self.tasks = tasks;
        self
    }

    pub fn exclusive(mut self, exclusive: bool) -> Self {
        self.exclusive = exclusive;
        self
    }

    pub fn time_limit(mut self, time_limit: TimeLimit) -> Self {
        self.time_limit = time_limit;
        self
    }

    pub fn stderr_path(mut self, path: impl Into<String>) -> Self {
        self.stderr_path = path.into();
        self
    }

    pub fn stdout_path(mut self, path: impl Into<String>) -> Self {
        self.stdout_path = path.into();
        self
    }

    pub fn modules(mut self, modules: Vec<EnvModule>) -> Self {
        self.modules = modules;
        self
    }

    pub fn backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    pub fn build(self) -> JobDescriptor {
        JobDescriptor {
            account: self.account,
            job_name: self.job_name,
            tasks: self.tasks,
            exclusive: self.exclusive,
            time_limit: self.time_limit,
            stderr_path: self.stderr_path,
            stdout_path: self.stdout_path,
            gres: self.gres,
            modules: self.modules,
            backend: self.backend,
            command: self.command,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::gres::GpuModel;

    fn descriptor() -> JobDescriptor {
        JobDescriptor::builder(
            "SNIC2018-3-406",
            GresRequest::new(GpuModel::V100, 1),
            TrainCommand::new("brats/loop_train_v100.py").dim(2),
        )
        .modules(vec![EnvModule::new("GCC", "6.4.0")])
        .build()
    }

    #[test]
    fn test_time_limit_display() {
        assert_eq!(TimeLimit::from_days(7).to_string(), "7-00:00:00");
        assert_eq!(
            "2-12:00:00".parse::<TimeLimit>().unwrap().to_string(),
            "2-12:00:00"
        );
    }

    #[test]
    fn test_builder_defaults() {
        let job = descriptor();
        assert_eq!(job.tasks, 1);
        assert!(!job.exclusive);
        assert_eq!(job.time_limit, TimeLimit::from_days(7));
        assert_eq!(job.stdout_path, "job.%J.out");
        assert_eq!(job.stderr_path, "job.%J.err");
        assert_eq!(job.backend, Backend::Tensorflow);
    }

    #[test]
    fn test_validate_accepts_default_descriptor() {
        assert!(descriptor().validate(&Partition::default()).is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_account() {
        let mut job = descriptor();
        job.account = "  ".to_string();
        assert!(job.validate(&Partition::default()).is_err());
    }

    #[test]
    fn test_validate_rejects_directive_injection_via_account() {
        let mut job = descriptor();
        job.account = "PROJ-1\n#SBATCH --exclusive".to_string();
        let err = job.validate(&Partition::default()).unwrap_err();
        assert!(err.to_string().contains("control characters"));
    }

    #[test]
    fn test_validate_rejects_control_characters_in_directive_fields() {
        let mut job = descriptor();
        job.job_name = Some("brats\ttrain".to_string());
        assert!(job.validate(&Partition::default()).is_err());

        let mut job = descriptor();
        job.stderr_path = "job.%J.err\nrm -rf /".to_string();
        assert!(job.validate(&Partition::default()).is_err());
    }

    #[test]
    fn test_validate_rejects_leading_hash_in_directive_fields() {
        let mut job = descriptor();
        job.job_name = Some("# comment".to_string());
        let err = job.validate(&Partition::default()).unwrap_err();
        assert!(err.to_string().contains("must not start with '#'"));
    }

    #[test]
    fn test_time_limit_from_days_saturates() {
        let limit = TimeLimit::from_days(u64::MAX);
        assert_eq!(limit.as_duration(), Duration::from_secs(u64::MAX));
    }

    #[test]
    fn test_validate_rejects_zero_tasks() {
        let mut job = descriptor();
        job.tasks = 0;
        assert!(job.validate(&Partition::default()).is_err());
    }

    #[test]
    fn test_validate_rejects_unsatisfiable_gres() {
        let mut job = descriptor();
        job.gres = GresRequest::new(GpuModel::V100, 16);
        let err = job.validate(&Partition::default()).unwrap_err();
        assert!(err.to_string().contains("cannot be satisfied"));
    }

    #[test]
    fn test_validate_rejects_log_path_without_placeholder() {
        let mut job = descriptor();
        job.stdout_path = "job.out".to_string();
        let err = job.validate(&Partition::default()).unwrap_err();
        assert!(err.to_string().contains("job-ID placeholder"));
    }

    #[test]
    fn test_validate_rejects_empty_module_list() {
        let mut job = descriptor();
        job.modules.clear();
        assert!(job.validate(&Partition::default()).is_err());
    }
}
