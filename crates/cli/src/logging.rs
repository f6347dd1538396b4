//! Tracing setup

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::system_config::LoggingConfig;

/// Environment variable overriding the configured filter
pub const LOG_ENV: &str = "PARLEY_LOG";

const DEFAULT_LEVEL: &str = "warn";

/// Install the global subscriber
///
/// Logs go to stderr, or to `logging.file` when configured. The returned
/// guard must be held until exit so buffered file output is flushed.
pub fn init(config: Option<&LoggingConfig>) -> Option<WorkerGuard> {
    let level = config.map_or(DEFAULT_LEVEL, |c| c.level.as_str());
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));

    let file = config.and_then(|c| c.file.as_deref());
    let target = file.and_then(|path| {
        let name = path.file_name()?;
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        Some((dir.to_path_buf(), name.to_owned()))
    });

    match target {
        Some((dir, name)) => {
            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
            None
        }
    }
}
