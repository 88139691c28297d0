//! Logging setup for the `hisab` binary
//!
//! Human-readable output goes to stderr so exported bytes and tables on
//! stdout stay clean. An optional JSON log file, rotated daily, captures
//! the same events for bug reports. `RUST_LOG` overrides the default filter.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Directory for JSON log files
    pub log_dir: PathBuf,

    /// Write JSON logs to `log_dir`
    pub enable_json_logs: bool,

    /// Include file/line information on the console
    pub include_location: bool,

    /// Filter used when `RUST_LOG` is unset
    pub default_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: log_directory(),
            enable_json_logs: false,
            include_location: cfg!(debug_assertions),
            default_filter: "warn,hisab_cli=info,hisab_export=info,hisab_core=info".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Filter for a `-v` count: 0 keeps the default, 1 is debug, 2+ is trace
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.default_filter = match verbosity {
            0 => self.default_filter,
            1 => "info,hisab_cli=debug,hisab_export=debug,hisab_core=debug".to_string(),
            _ => "debug,hisab_cli=trace,hisab_export=trace,hisab_core=trace".to_string(),
        };
        self
    }

    pub fn with_json_logs(mut self, enabled: bool) -> Self {
        self.enable_json_logs = enabled;
        self
    }
}

/// Install the global subscriber.
///
/// When JSON logs are enabled the returned guard owns the file writer;
/// buffered events are flushed when it is dropped, so hold it until the
/// last event has been logged.
pub fn init(config: LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let mut layers = Vec::new();
    let mut guard = None;

    layers.push(
        fmt::layer()
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .with_filter(env_filter.clone())
            .boxed(),
    );

    if config.enable_json_logs {
        std::fs::create_dir_all(&config.log_dir)?;
        let file_appender = tracing_appender::rolling::daily(&config.log_dir, "hisab.log");
        let (non_blocking, worker) = tracing_appender::non_blocking(file_appender);
        guard = Some(worker);

        layers.push(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_ansi(false)
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .with_writer(non_blocking)
                .with_filter(env_filter)
                .boxed(),
        );
    }

    tracing_subscriber::registry().with(layers).try_init()?;

    tracing::debug!(
        log_dir = %config.log_dir.display(),
        json_enabled = config.enable_json_logs,
        "Logging initialized"
    );
    Ok(guard)
}

/// `<local data dir>/hisab/logs`
pub fn log_directory() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("hisab")
        .join("logs")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_log_is_flushed_when_guard_drops() {
        let dir = tempfile::tempdir().unwrap();
        let config = LoggingConfig {
            log_dir: dir.path().to_path_buf(),
            enable_json_logs: true,
            include_location: false,
            default_filter: "info".to_string(),
        };
        let guard = init(config).unwrap();
        assert!(guard.is_some());

        tracing::error!(code = 1, "Command failed");
        drop(guard);

        let mut logged = String::new();
        for entry in std::fs::read_dir(dir.path()).unwrap() {
            logged.push_str(&std::fs::read_to_string(entry.unwrap().path()).unwrap());
        }
        assert!(logged.contains("Command failed"));
    }

    #[test]
    fn test_verbosity_replaces_default_filter() {
        let quiet = LoggingConfig::default().with_verbosity(0);
        assert!(quiet.default_filter.starts_with("warn"));
        let loud = LoggingConfig::default().with_verbosity(2);
        assert!(loud.default_filter.contains("hisab_export=trace"));
    }
}
