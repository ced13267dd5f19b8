//! File logging for the dashboard.
//!
//! The terminal belongs to the TUI, so log output goes to a single file
//! (cleared at startup) through a non-blocking writer. `RUST_LOG` overrides
//! the configured level.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

/// Keeps the background writer alive; dropping it flushes the log file.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
    path: PathBuf,
}

impl LoggingGuard {
    /// Path of the active log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Install the global subscriber writing to `config.dir/config.file`.
pub fn init_logging(config: &LogConfig) -> io::Result<LoggingGuard> {
    let path = prepare_log_file(&config.dir, &config.file)?;

    let file_appender = tracing_appender::rolling::never(&config.dir, &config.file);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter(&config.level))
        .with(file_layer)
        .try_init()
        .map_err(io::Error::other)?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
        path,
    })
}

/// `RUST_LOG` if set and valid, otherwise `level`, otherwise `info`.
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Create the log directory and truncate the previous session's file.
fn prepare_log_file(dir: &Path, file: &str) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(file);
    fs::write(&path, "")?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_creates_directory_and_clears_file() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("logs");

        let path = prepare_log_file(&dir, "dashboard.log").unwrap();
        assert!(dir.exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), "");

        fs::write(&path, "old session").unwrap();
        prepare_log_file(&dir, "dashboard.log").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    // The only test that installs the global subscriber.
    #[test]
    fn test_init_logging_writes_to_configured_file() {
        let root = tempfile::tempdir().unwrap();
        let config = LogConfig {
            dir: root.path().join("logs"),
            file: "dashboard.log".to_string(),
            level: "info".to_string(),
        };

        let guard = init_logging(&config).unwrap();
        assert_eq!(guard.path(), root.path().join("logs").join("dashboard.log"));

        tracing::error!("dashboard log line");
        let path = guard.path().to_path_buf();
        drop(guard);

        let contents = fs::read_to_string(path).unwrap();
        assert!(contents.contains("dashboard log line"));
    }

    #[test]
    fn test_env_filter_falls_back_on_bad_level() {
        let filter = env_filter("not a [valid directive");
        assert!(!filter.to_string().is_empty());
    }
}
