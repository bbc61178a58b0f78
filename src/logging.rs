//! Logger bootstrap for the command-line front end.
//!
//! Events are single `key=value` metadata lines such as
//! `event=state_loaded module=store status=ok`.

use std::path::Path;

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;

use crate::error::AppError;

const LOG_FILE_BASENAME: &str = "covey";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;

/// Starts the global logger. The returned handle must stay alive for the
/// rest of the process or buffered lines are lost.
///
/// Without `log_dir` lines go to stderr; with it they go to rotating files.
pub fn init_logging(level: &str, log_dir: Option<&Path>) -> Result<LoggerHandle, AppError> {
    let level = normalize_level(level)?;
    let logger = Logger::try_with_str(level)
        .map_err(|err| AppError::Config(format!("invalid log level `{level}`: {err}")))?;

    let logger = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            logger
                .log_to_file(
                    FileSpec::default()
                        .directory(dir)
                        .basename(LOG_FILE_BASENAME),
                )
                .rotate(
                    Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
                    Naming::Numbers,
                    Cleanup::KeepLogFiles(MAX_LOG_FILES),
                )
                .write_mode(WriteMode::BufferAndFlush)
                .append()
                .format_for_files(flexi_logger::detailed_format)
        }
        None => logger.log_to_stderr().format(flexi_logger::default_format),
    };

    let handle = logger
        .start()
        .map_err(|err| AppError::Config(format!("failed to start logger: {err}")))?;
    info!(
        "event=app_start module=logging status=ok level={} version={}",
        level,
        env!("CARGO_PKG_VERSION")
    );
    Ok(handle)
}

pub fn normalize_level(level: &str) -> Result<&'static str, AppError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "off" => Ok("off"),
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(AppError::Config(format!(
            "unsupported log level `{other}`; expected off|trace|debug|info|warn|error"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_normalized() {
        assert_eq!(normalize_level(" WARNING ").expect("warn"), "warn");
        assert_eq!(normalize_level("debug").expect("debug"), "debug");
        assert!(matches!(normalize_level("loud"), Err(AppError::Config(_))));
    }
}
