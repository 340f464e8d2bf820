use crate::core::get_config_dir;
use crate::core::gres::Partition;
use crate::core::presets::DEFAULT_ACCOUNT;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    /// Billing account applied to submitted jobs
    #[serde(default = "default_account")]
    pub account: String,
    /// Path to (or name of) the sbatch binary
    #[serde(default = "default_sbatch_bin")]
    pub sbatch_bin: String,
    /// The partition submissions are validated against
    #[serde(default)]
    pub partition: Partition,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            account: default_account(),
            sbatch_bin: default_sbatch_bin(),
            partition: Partition::default(),
        }
    }
}

fn default_account() -> String {
    DEFAULT_ACCOUNT.to_string()
}

fn default_sbatch_bin() -> String {
    "sbatch".to_string()
}

pub fn load_config(config_path: Option<&PathBuf>) -> Result<Config, config::ConfigError> {
    let mut config_vec = vec![];

    // User-provided config file
    if let Some(config_path) = config_path {
        if config_path.exists() {
            config_vec.push(config_path.clone());
        } else {
            eprintln!("Warning: Config file {config_path:?} not found.");
        }
    }

    // Default config file
    if let Ok(default_config_path) = get_config_dir().map(|d| d.join("tbatch.toml")) {
        if default_config_path.exists() {
            config_vec.push(default_config_path);
        }
    }

    let settings = config::Config::builder();
    let settings = config_vec.iter().fold(settings, |s, path| {
        s.add_source(config::File::from(path.as_path()))
    });

    settings
        .add_source(config::Environment::with_prefix("TBATCH"))
        .build()?
        .try_deserialize()
}
