use anyhow::Result;
use log::LevelFilter;
use std::fs::OpenOptions;
use std::path::Path;

/// Route the log macros to an append-only file, one timestamped line per
/// event.
pub fn setup_logging(file: &Path, level: &str) -> Result<()> {
    let level = level.parse::<LevelFilter>()?;

    let file = OpenOptions::new().create(true).append(true).open(file)?;

    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp_secs()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();

    Ok(())
}
