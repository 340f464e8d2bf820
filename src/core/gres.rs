use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use strum::{Display, EnumString};

/// GPU models known to the cluster, named the way Slurm's GRES plugin
/// spells them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum GpuModel {
    V100,
    K80,
}

/// A generic-resource request: GPU model plus device count.
///
/// Renders as the `--gres` value Slurm expects (`gpu:v100:1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GresRequest {
    pub model: GpuModel,
    pub count: u32,
}

impl GresRequest {
    pub fn new(model: GpuModel, count: u32) -> Self {
        Self { model, count }
    }
}

impl fmt::Display for GresRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gpu:{}:{}", self.model, self.count)
    }
}

impl FromStr for GresRequest {
    type Err = anyhow::Error;

    /// Accepts `gpu:v100:1`, `v100:2`, or a bare model name (count 1).
    fn from_str(s: &str) -> Result<Self> {
        let spec = s.trim();
        let spec = spec.strip_prefix("gpu:").unwrap_or(spec);

        let (model_str, count) = match spec.split_once(':') {
            Some((model, count)) => (
                model,
                count
                    .parse::<u32>()
                    .with_context(|| format!("Invalid GPU count in GRES request: {s}"))?,
            ),
            None => (spec, 1),
        };

        let model = GpuModel::from_str(model_str)
            .map_err(|_| anyhow!("Unknown GPU model in GRES request: {model_str}"))?;

        Ok(Self { model, count })
    }
}

/// The slice of a cluster partition this tool cares about: which GPU
/// models it offers and how many devices a single node carries.
#[derive(Debug, Clone, Deserialize)]
pub struct Partition {
    #[serde(default = "default_partition_name")]
    pub name: String,
    #[serde(default = "default_partition_gpus")]
    pub gpus: HashMap<GpuModel, u32>,
}

impl Partition {
    pub fn can_satisfy(&self, request: &GresRequest) -> bool {
        request.count >= 1
            && self
                .gpus
                .get(&request.model)
                .is_some_and(|&max| request.count <= max)
    }
}

impl Default for Partition {
    fn default() -> Self {
        Self {
            name: default_partition_name(),
            gpus: default_partition_gpus(),
        }
    }
}

fn default_partition_name() -> String {
    "gpu".to_string()
}

fn default_partition_gpus() -> HashMap<GpuModel, u32> {
    HashMap::from([(GpuModel::V100, 2), (GpuModel::K80, 4)])
}
