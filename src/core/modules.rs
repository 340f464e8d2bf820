use anyhow::{anyhow, Result};
use std::fmt;
use std::str::FromStr;
use strum::Display;

/// Environment variable the downstream trainer reads to pick its
/// numerical backend.
pub const BACKEND_ENV_VAR: &str = "KERAS_BACKEND";

/// Deep-learning backend selected for the training process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Backend {
    Tensorflow,
}

/// A versioned toolchain module, loaded with `module load NAME/VERSION`.
///
/// Load order matters for dependency resolution, so descriptors keep
/// modules in a plain `Vec` and never reorder them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvModule {
    pub name: String,
    pub version: String,
}

impl EnvModule {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for EnvModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.version)
    }
}

impl FromStr for EnvModule {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (name, version) = s
            .trim()
            .split_once('/')
            .ok_or_else(|| anyhow!("Invalid module spec (expected NAME/VERSION): {s}"))?;
        if name.is_empty() || version.is_empty() {
            return Err(anyhow!("Invalid module spec (expected NAME/VERSION): {s}"));
        }
        Ok(Self::new(name, version))
    }
}
