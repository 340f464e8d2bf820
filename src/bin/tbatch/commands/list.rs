use anyhow::Result;
use strum::IntoEnumIterator;
use tbatch::core::presets::Preset;

pub(crate) fn handle_list() -> Result<()> {
    for preset in Preset::iter() {
        let job = preset.descriptor();
        println!(
            "{:<6} {:<12} time={} exclusive={} {}",
            preset,
            job.gres,
            job.time_limit,
            job.exclusive,
            job.command.render()
        );
    }
    Ok(())
}
