use clap::{Parser, ValueEnum};
use clap_complete::Shell as CompleteShell;
use tbatch::core::presets::Preset;
use tbatch::core::version;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "tbatch", author, version = version(), about = "Submits GPU training jobs to Slurm from typed job descriptors.")]
pub struct TBatch {
    /// Sub Commands
    #[command(subcommand)]
    pub commands: Commands,

    #[command(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity,

    #[arg(long, global = true, help = "Path to the config file")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Parser)]
pub enum Commands {
    /// Submit a preset job descriptor to the scheduler
    #[command(alias = "sub")]
    Submit(SubmitArgs),
    /// Print the rendered batch script for a preset
    Show(ShowArgs),
    /// List the shipped job presets
    List,
    /// Create a new job script template
    New(NewArgs),
    /// Show recently submitted job IDs
    History(HistoryArgs),
    /// Generate tab-completion scripts for your shell
    #[command(arg_required_else_help = true)]
    Completions(CompletionsArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct SubmitArgs {
    /// The preset to submit
    pub preset: Preset,

    /// Override the billing account
    #[arg(short, long)]
    pub account: Option<String>,

    /// Override the wall-clock limit (e.g. "7-00:00:00")
    #[arg(short, long)]
    pub time: Option<String>,

    /// Override the GPU request (e.g. "gpu:v100:1")
    #[arg(short, long)]
    pub gres: Option<String>,

    /// Request the node exclusively
    #[arg(long, conflicts_with = "no_exclusive")]
    pub exclusive: bool,

    /// Share the node with other jobs
    #[arg(long)]
    pub no_exclusive: bool,

    /// Block until the job completes
    #[arg(long)]
    pub wait: bool,

    /// Print the batch script instead of submitting it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Parser)]
pub struct ShowArgs {
    /// The preset to render
    pub preset: Preset,
}

#[derive(Debug, Parser)]
pub struct NewArgs {
    /// The name of the new job
    pub name: String,
}

#[derive(Debug, Parser)]
pub struct HistoryArgs {
    /// How many submissions to show
    #[arg(short, long, default_value = "10")]
    pub count: usize,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
    Elvish,
}

#[derive(Debug, Parser)]
pub struct CompletionsArgs {
    /// The shell to generate the completions for
    pub shell: Shell,
}

impl From<Shell> for CompleteShell {
    fn from(shell: Shell) -> Self {
        match shell {
            Shell::Bash => CompleteShell::Bash,
            Shell::Elvish => CompleteShell::Elvish,
            Shell::Fish => CompleteShell::Fish,
            Shell::Powershell => CompleteShell::PowerShell,
            Shell::Zsh => CompleteShell::Zsh,
        }
    }
}
