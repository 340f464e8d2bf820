use crate::core::job::JobDescriptor;
use crate::core::modules::BACKEND_ENV_VAR;

/// Render a descriptor to the batch script handed to `sbatch`.
///
/// The layout is fixed: shebang, `#SBATCH` directives, module loads in
/// declared order, the backend export, the `srun`-wrapped command, and a
/// final `wait` so the allocation is held until the trainer exits.
pub fn render(job: &JobDescriptor) -> String {
    let mut script = String::from("#!/bin/bash\n");

    script.push_str(&format!("#SBATCH -A {}\n", job.account));
    if let Some(name) = &job.job_name {
        script.push_str(&format!("#SBATCH -J {name}\n"));
    }
    script.push_str(&format!("#SBATCH -n {}\n", job.tasks));
    if job.exclusive {
        script.push_str("#SBATCH --exclusive\n");
    }
    script.push_str(&format!("#SBATCH --time={}\n", job.time_limit));
    script.push_str(&format!("#SBATCH --error={}\n", job.stderr_path));
    script.push_str(&format!("#SBATCH --output={}\n", job.stdout_path));
    script.push_str(&format!("#SBATCH --gres={}\n", job.gres));

    script.push('\n');
    let modules: Vec<String> = job.modules.iter().map(ToString::to_string).collect();
    script.push_str(&format!("module load {}\n", modules.join(" ")));
    script.push_str(&format!("export {}={}\n", BACKEND_ENV_VAR, job.backend));

    script.push('\n');
    script.push_str(&format!("srun {}\n", job.command.render()));
    script.push_str("wait\n");

    script
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::presets::Preset;

    #[test]
    fn test_render_v100_descriptor() {
        let script = render(&Preset::V100.descriptor());
        assert_eq!(
            script,
            "#!/bin/bash\n\
             #SBATCH -A SNIC2018-3-406\n\
             #SBATCH -n 1\n\
             #SBATCH --time=7-00:00:00\n\
             #SBATCH --error=job.%J.err\n\
             #SBATCH --output=job.%J.out\n\
             #SBATCH --gres=gpu:v100:1\n\
             \n\
             module load GCC/6.4.0 CUDA/9.0.176 OpenMPI/2.1.1\n\
             export KERAS_BACKEND=tensorflow\n\
             \n\
             srun python brats/loop_train_v100.py -dim 2\n\
             wait\n"
        );
    }

    #[test]
    fn test_render_k80_descriptor() {
        let script = render(&Preset::K80.descriptor());
        assert_eq!(
            script,
            "#!/bin/bash\n\
             #SBATCH -A SNIC2018-3-406\n\
             #SBATCH -n 1\n\
             #SBATCH --exclusive\n\
             #SBATCH --time=7-00:00:00\n\
             #SBATCH --error=job.%J.err\n\
             #SBATCH --output=job.%J.out\n\
             #SBATCH --gres=gpu:k80:2\n\
             \n\
             module load GCC/6.4.0 CUDA/9.0.176 OpenMPI/2.1.1\n\
             export KERAS_BACKEND=tensorflow\n\
             \n\
             srun python brats/train.py -t 0 -o 0 -n 01 -de bm4d -hi 1 \
             -ba 4 -m densenfcn -ps 64-64-64 -l tv_minh\n\
             wait\n"
        );
    }

    #[test]
    fn test_backend_export_precedes_command() {
        let script = render(&Preset::V100.descriptor());
        let export_pos = script.find("export KERAS_BACKEND=tensorflow").unwrap();
        let srun_pos = script.find("srun ").unwrap();
        assert!(export_pos < srun_pos);
    }

    #[test]
    fn test_modules_load_in_declared_order() {
        let script = render(&Preset::K80.descriptor());
        let line = script
            .lines()
            .find(|line| line.starts_with("module load"))
            .unwrap();
        assert_eq!(line, "module load GCC/6.4.0 CUDA/9.0.176 OpenMPI/2.1.1");
    }

    #[test]
    fn test_job_name_directive_when_set() {
        let mut job = Preset::V100.descriptor();
        job.job_name = Some("brats-v100".to_string());
        let script = render(&job);
        assert!(script.contains("#SBATCH -J brats-v100\n"));
    }
}
