use crate::core::command::{PatchSize, TrainCommand};
use crate::core::gres::{GpuModel, GresRequest};
use crate::core::job::JobDescriptor;
use crate::core::modules::EnvModule;
use clap::ValueEnum;
use strum::{Display, EnumIter, EnumString};

/// Default billing account for the shipped presets. Site-specific;
/// overridable from the config file and the CLI.
pub const DEFAULT_ACCOUNT: &str = "SNIC2018-3-406";

/// The job descriptors this tool ships, mirroring the original
/// submission scripts one-to-one.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Display, EnumIter, EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum Preset {
    /// 2D loop training on a single V100
    V100,
    /// Denoised DenseNet-FCN training on two K80s
    K80,
}

impl Preset {
    pub fn descriptor(&self) -> JobDescriptor {
        match self {
            Preset::V100 => v100(),
            Preset::K80 => k80(),
        }
    }
}

/// Toolchain stack both presets load. Order matters: the compiler comes
/// first, then CUDA, then the MPI library built against them.
fn toolchain_modules() -> Vec<EnvModule> {
    vec![
        EnvModule::new("GCC", "6.4.0"),
        EnvModule::new("CUDA", "9.0.176"),
        EnvModule::new("OpenMPI", "2.1.1"),
    ]
}

fn v100() -> JobDescriptor {
    JobDescriptor::builder(
        DEFAULT_ACCOUNT,
        GresRequest::new(GpuModel::V100, 1),
        TrainCommand::new("brats/loop_train_v100.py").dim(2),
    )
    .modules(toolchain_modules())
    .build()
}

// The original k80 script requested the node exclusively while the v100
// one did not. The difference is preserved as observed.
fn k80() -> JobDescriptor {
    JobDescriptor::builder(
        DEFAULT_ACCOUNT,
        GresRequest::new(GpuModel::K80, 2),
        TrainCommand::new("brats/train.py")
            .time_budget(0)
            .output_index(0)
            .run_index("01")
            .data_encoding("bm4d")
            .hist_match(1)
            .batch_size(4)
            .model("densenfcn")
            .patch_size(PatchSize([64, 64, 64]))
            .loss("tv_minh"),
    )
    .exclusive(true)
    .modules(toolchain_modules())
    .build()
}
