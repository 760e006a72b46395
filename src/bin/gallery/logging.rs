use std::path::PathBuf;

use anyhow::bail;
use flexi_logger::{Cleanup, Criterion, Duplicate, FileSpec, Logger, Naming};

use crate::config::{ConfigPaths, LoggingConfig};

const LOG_BASENAME: &str = "gallery";

/// Starts the rotating file logger. `RUST_LOG` takes precedence over the
/// configured level.
pub fn init_logging(config: &LoggingConfig, paths: &ConfigPaths) -> anyhow::Result<()> {
    let (directory, basename) = log_file_location(config, paths);
    let duplicate = stderr_duplicate(config.stderr.as_deref())?;
    Logger::try_with_env_or_str(&config.level)?
        .log_to_file(FileSpec::default().directory(directory).basename(basename))
        .duplicate_to_stderr(duplicate)
        .rotate(
            Criterion::Size(config.rotate_size),
            Naming::Numbers,
            Cleanup::KeepLogFiles(config.rotate_keep),
        )
        .start()?;
    Ok(())
}

/// Directory and basename of the log file.
fn log_file_location(config: &LoggingConfig, paths: &ConfigPaths) -> (PathBuf, String) {
    let Some(path) = config.path.as_ref().map(PathBuf::from) else {
        return (paths.logs_dir.clone(), LOG_BASENAME.to_string());
    };
    let directory = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| paths.logs_dir.clone());
    let basename = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(LOG_BASENAME)
        .to_string();
    (directory, basename)
}

fn stderr_duplicate(level: Option<&str>) -> anyhow::Result<Duplicate> {
    let Some(level) = level else {
        return Ok(Duplicate::None);
    };
    Ok(match level.to_ascii_lowercase().as_str() {
        "off" | "none" => Duplicate::None,
        "error" => Duplicate::Error,
        "warn" | "warning" => Duplicate::Warn,
        "info" => Duplicate::Info,
        "debug" => Duplicate::Debug,
        "trace" => Duplicate::Trace,
        other => bail!("unknown stderr log level '{other}'"),
    })
}
