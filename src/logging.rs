//! Tracing setup for the CLI.
//!
//! Events go to stderr, leaving stdout for command output, and are mirrored without ANSI colors
//! to an append-only log file (`logs/ragdesk.log` unless `RAGDESK_LOG_FILE` names another path).
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Log file used when none is configured.
pub const DEFAULT_LOG_FILE: &str = "logs/ragdesk.log";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Install the global subscriber.
///
/// `RUST_LOG` filters events (default `info`). If the log file cannot be prepared, logging
/// continues on stderr only. Calling this more than once keeps the first subscriber.
pub fn init_tracing(log_file: Option<&str>) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();
    let file_layer = file_writer(&resolve_log_path(log_file)).map(|writer| {
        fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .compact()
    });

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init();
}

/// Path of the log file for an optional configured override. Blank overrides are ignored.
pub fn resolve_log_path(log_file: Option<&str>) -> PathBuf {
    log_file
        .map(str::trim)
        .filter(|path| !path.is_empty())
        .unwrap_or(DEFAULT_LOG_FILE)
        .into()
}

fn file_writer(path: &Path) -> Option<NonBlocking> {
    let directory = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let Some(file_name) = path.file_name() else {
        eprintln!("Invalid log file path {}", path.display());
        return None;
    };
    if let Err(err) = std::fs::create_dir_all(directory) {
        eprintln!("Failed to create log directory {}: {err}", directory.display());
        return None;
    }

    let appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let _ = LOG_GUARD.set(guard);
    Some(writer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_default_path() {
        assert_eq!(resolve_log_path(None), PathBuf::from(DEFAULT_LOG_FILE));
        assert_eq!(resolve_log_path(Some("  ")), PathBuf::from(DEFAULT_LOG_FILE));
        assert_eq!(
            resolve_log_path(Some("/var/log/ragdesk.log")),
            PathBuf::from("/var/log/ragdesk.log")
        );
    }

    #[test]
    fn creates_missing_log_directory() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let path = dir.path().join("nested").join("client.log");

        assert!(file_writer(&path).is_some());
        assert!(dir.path().join("nested").is_dir());
    }
}
