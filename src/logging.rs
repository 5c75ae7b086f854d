//! Logging configuration using the tracing ecosystem.
//!
//! Logs go to a daily-rotated file so the terminal UI is never written over.
//! The filter comes from `RUST_LOG`, falling back to a default that keeps
//! this crate at `info` and everything else at `warn`.

use std::path::PathBuf;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Default log filter if RUST_LOG is not set.
const DEFAULT_LOG_FILTER: &str = "helpdesk_tui=info,warn";

/// Filter forced by `--debug`.
const DEBUG_LOG_FILTER: &str = "helpdesk_tui=debug,warn";

/// Log file name prefix; the appender adds the date.
const LOG_FILE_NAME: &str = "helpdesk-tui.log";

/// Initialize the logging system.
///
/// Logs are stored under the platform's local data directory:
/// - Linux: `~/.local/share/helpdesk-tui/logs/`
/// - macOS: `~/Library/Application Support/helpdesk-tui/logs/`
/// - Windows: `C:\Users\<User>\AppData\Local\helpdesk-tui\logs\`
///
/// With `debug` set, `RUST_LOG` is ignored and this crate logs at `debug`.
///
/// # Errors
///
/// Returns an error if the log directory cannot be determined or created,
/// or the global subscriber is already set.
pub fn init(debug: bool) -> anyhow::Result<()> {
    let log_dir = get_log_directory()?;
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE_NAME);

    let subscriber = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(build_filter(debug));

    tracing::subscriber::set_global_default(subscriber)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "helpdesk-tui starting up");
    tracing::debug!(log_dir = %log_dir.display(), "Log directory");

    Ok(())
}

fn build_filter(debug: bool) -> EnvFilter {
    if debug {
        return EnvFilter::new(DEBUG_LOG_FILTER);
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Get the log directory path.
fn get_log_directory() -> anyhow::Result<PathBuf> {
    let base_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;

    Ok(base_dir.join("helpdesk-tui").join("logs"))
}

/// Where logs are stored, for showing to users.
pub fn log_directory() -> Option<PathBuf> {
    get_log_directory().ok()
}

/// Log application shutdown.
pub fn shutdown() {
    tracing::info!("helpdesk-tui shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_directory_has_expected_structure() {
        let dir = get_log_directory().unwrap();
        assert!(dir.ends_with("helpdesk-tui/logs"));
    }

    #[test]
    fn test_debug_filter_overrides_env() {
        let filter = build_filter(true);
        assert!(filter.to_string().contains("helpdesk_tui=debug"));
    }
}
