use anyhow::{anyhow, Context, Result};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// A patch-size triple, rendered the way the trainer's `-ps` flag
/// expects it (`64-64-64`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchSize(pub [u32; 3]);

impl fmt::Display for PatchSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.0[0], self.0[1], self.0[2])
    }
}

impl FromStr for PatchSize {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<u32> = s
            .trim()
            .split('-')
            .map(|part| {
                part.parse::<u32>()
                    .with_context(|| format!("Invalid patch size component: {part}"))
            })
            .collect::<Result<_>>()?;
        match parts.as_slice() {
            [a, b, c] => Ok(Self([*a, *b, *c])),
            _ => Err(anyhow!("Invalid patch size (expected A-B-C): {s}")),
        }
    }
}

/// The external training invocation: interpreter, script path, and the
/// flag set the trainer accepts. Flag values are owned by the trainer;
/// this type only carries them and renders them in a fixed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainCommand {
    pub interpreter: String,
    pub script: String,
    /// `-dim` model dimensionality
    pub dim: Option<u8>,
    /// `-t` time-budget index
    pub time_budget: Option<u32>,
    /// `-o` output index
    pub output_index: Option<u32>,
    /// `-n` run index
    pub run_index: Option<String>,
    /// `-de` data-encoding mode
    pub data_encoding: Option<String>,
    /// `-hi` histogram-match flag
    pub hist_match: Option<u8>,
    /// `-ba` batch size
    pub batch_size: Option<u32>,
    /// `-m` model architecture name
    pub model: Option<String>,
    /// `-ps` patch-size triple
    pub patch_size: Option<PatchSize>,
    /// `-l` loss-function name
    pub loss: Option<String>,
}

impl TrainCommand {
    pub fn new(script: impl Into<String>) -> Self {
        Self {
            interpreter: "python".to_string(),
            script: script.into(),
            dim: None,
            time_budget: None,
            output_index: None,
            run_index: None,
            data_encoding: None,
            hist_match: None,
            batch_size: None,
            model: None,
            patch_size: None,
            loss: None,
        }
    }

    pub fn dim(mut self, dim: u8) -> Self {
        self.dim = Some(dim);
        self
    }

    pub fn time_budget(mut self, index: u32) -> Self {
        self.time_budget = Some(index);
        self
    }

    pub fn output_index(mut self, index: u32) -> Self {
        self.output_index = Some(index);
        self
    }

    pub fn run_index(mut self, index: impl Into<String>) -> Self {
        self.run_index = Some(index.into());
        self
    }

    pub fn data_encoding(mut self, mode: impl Into<String>) -> Self {
        self.data_encoding = Some(mode.into());
        self
    }

    pub fn hist_match(mut self, flag: u8) -> Self {
        self.hist_match = Some(flag);
        self
    }

    pub fn batch_size(mut self, size: u32) -> Self {
        self.batch_size = Some(size);
        self
    }

    pub fn model(mut self, name: impl Into<String>) -> Self {
        self.model = Some(name.into());
        self
    }

    pub fn patch_size(mut self, patch_size: PatchSize) -> Self {
        self.patch_size = Some(patch_size);
        self
    }

    pub fn loss(mut self, name: impl Into<String>) -> Self {
        self.loss = Some(name.into());
        self
    }

    /// Argv for the invocation, flags in the order the original call
    /// sites use them.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![self.interpreter.clone(), self.script.clone()];

        if let Some(dim) = self.dim {
            args.push("-dim".to_string());
            args.push(dim.to_string());
        }
        if let Some(index) = self.time_budget {
            args.push("-t".to_string());
            args.push(index.to_string());
        }
        if let Some(index) = self.output_index {
            args.push("-o".to_string());
            args.push(index.to_string());
        }
        if let Some(index) = &self.run_index {
            args.push("-n".to_string());
            args.push(index.clone());
        }
        if let Some(mode) = &self.data_encoding {
            args.push("-de".to_string());
            args.push(mode.clone());
        }
        if let Some(flag) = self.hist_match {
            args.push("-hi".to_string());
            args.push(flag.to_string());
        }
        if let Some(size) = self.batch_size {
            args.push("-ba".to_string());
            args.push(size.to_string());
        }
        if let Some(name) = &self.model {
            args.push("-m".to_string());
            args.push(name.clone());
        }
        if let Some(patch_size) = self.patch_size {
            args.push("-ps".to_string());
            args.push(patch_size.to_string());
        }
        if let Some(name) = &self.loss {
            args.push("-l".to_string());
            args.push(name.clone());
        }

        args
    }

    /// Single shell-safe command line. Every token goes through
    /// `shell_escape`, so no externally-supplied value can inject into
    /// the batch script.
    pub fn render(&self) -> String {
        self.to_args()
            .into_iter()
            .map(|arg| shell_escape::escape(Cow::Owned(arg)).into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_size_display_and_parse() {
        let patch_size = PatchSize([64, 64, 64]);
        assert_eq!(patch_size.to_string(), "64-64-64");
        assert_eq!("64-64-64".parse::<PatchSize>().unwrap(), patch_size);
        assert_eq!(
            "256-256-3".parse::<PatchSize>().unwrap(),
            PatchSize([256, 256, 3])
        );
    }

    #[test]
    fn test_patch_size_rejects_wrong_arity() {
        assert!("64-64".parse::<PatchSize>().is_err());
        assert!("64-64-64-64".parse::<PatchSize>().is_err());
        assert!("64-x-64".parse::<PatchSize>().is_err());
    }

    #[test]
    fn test_render_minimal_command() {
        let command = TrainCommand::new("brats/loop_train_v100.py").dim(2);
        assert_eq!(command.render(), "python brats/loop_train_v100.py -dim 2");
    }

    #[test]
    fn test_render_full_flag_set_in_order() {
        let command = TrainCommand::new("brats/train.py")
            .time_budget(0)
            .output_index(0)
            .run_index("01")
            .data_encoding("bm4d")
            .hist_match(1)
            .batch_size(4)
            .model("densenfcn")
            .patch_size(PatchSize([64, 64, 64]))
            .loss("tv_minh");
        assert_eq!(
            command.render(),
            "python brats/train.py -t 0 -o 0 -n 01 -de bm4d -hi 1 -ba 4 \
             -m densenfcn -ps 64-64-64 -l tv_minh"
        );
    }

    #[test]
    fn test_render_escapes_unsafe_tokens() {
        let command = TrainCommand::new("brats/train.py").loss("tv; rm -rf /");
        let rendered = command.render();
        assert!(rendered.ends_with("-l 'tv; rm -rf /'"));
    }
}
