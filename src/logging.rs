//! Logging setup: dual file/stdout `tracing` output with optional JSON
//! format and file rotation.

use std::path::PathBuf;

use color_eyre::eyre::Result;
use once_cell::sync::OnceCell;
use tracing::Level;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Log filename used by the daemon.
pub const LOG_FILENAME: &str = "drivedup-daemon.log";

static LOG_FILE_PATH: OnceCell<String> = OnceCell::new();

/// Record the log file path so error payloads can point operators at it.
/// Later calls are ignored.
pub fn set_log_file_path(path: String) {
    let _already_set = LOG_FILE_PATH.set(path);
}

/// The recorded log file path; empty before [`set_log_file_path`].
#[must_use]
pub fn get_log_file_path() -> String {
    LOG_FILE_PATH.get().cloned().unwrap_or_default()
}

/// Configuration for the logging system.
pub struct LogConfig {
    /// Directory where log files will be written.
    pub log_dir: PathBuf,
    /// Default log level when `RUST_LOG` is not set.
    pub log_level: Level,
    /// Whether to use JSON format for logs.
    pub json_format: bool,
    /// Log rotation period.
    pub rotation: Rotation,
}

impl Default for LogConfig {
    fn default() -> Self {
        let log_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".drivedup")
            .join("logs");

        Self {
            log_dir,
            log_level: Level::INFO,
            json_format: false,
            rotation: Rotation::DAILY,
        }
    }
}

/// A fresh filter per layer; `EnvFilter` is not clonable.
fn env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("drivedup_daemon={level}")))
}

/// Initialize the logging system with the given configuration.
///
/// Sets up dual output to file and stdout, with runtime level control via
/// `RUST_LOG`, JSON or human-readable format, and file rotation.
///
/// # Errors
///
/// Returns an error if the log directory cannot be created.
pub fn init_logging(config: LogConfig) -> Result<()> {
    std::fs::create_dir_all(&config.log_dir)?;

    let file_appender = RollingFileAppender::new(config.rotation, &config.log_dir, LOG_FILENAME);

    if config.json_format {
        let file_layer = fmt::layer()
            .json()
            .with_writer(file_appender)
            .with_span_events(FmtSpan::CLOSE)
            .with_current_span(true)
            .with_target(true)
            .with_filter(env_filter(config.log_level));

        let stdout_layer = fmt::layer()
            .json()
            .with_writer(std::io::stdout)
            .with_span_events(FmtSpan::CLOSE)
            .with_current_span(true)
            .with_target(true)
            .with_filter(env_filter(config.log_level));

        tracing_subscriber::registry()
            .with(file_layer)
            .with(stdout_layer)
            .with(ErrorLayer::default())
            .init();
    } else {
        let file_layer = fmt::layer()
            .with_writer(file_appender)
            .with_span_events(FmtSpan::CLOSE)
            .with_target(true)
            .with_ansi(false) // No ANSI colors in files
            .with_filter(env_filter(config.log_level));

        let stdout_layer = fmt::layer()
            .with_writer(std::io::stdout)
            .with_span_events(FmtSpan::CLOSE)
            .with_ansi(true)
            .with_filter(env_filter(config.log_level));

        tracing_subscriber::registry()
            .with(file_layer)
            .with(stdout_layer)
            .with(ErrorLayer::default())
            .init();
    }

    Ok(())
}

/// Parse a rotation period from its CLI spelling; unknown values fall back
/// to daily rotation.
#[must_use]
pub fn parse_rotation(value: &str) -> Rotation {
    match value.to_ascii_lowercase().as_str() {
        "hourly" => Rotation::HOURLY,
        "never" => Rotation::NEVER,
        _ => Rotation::DAILY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_config_default() {
        let config = LogConfig::default();
        assert_eq!(config.log_level, Level::INFO);
        assert!(!config.json_format);
        assert!(config.log_dir.ends_with("logs"));
    }

    #[test]
    fn test_log_config_default_dir_is_under_drivedup() {
        let config = LogConfig::default();
        assert!(config.log_dir.to_string_lossy().contains(".drivedup"));
    }

    #[test]
    fn test_parse_rotation_known_values() {
        // Rotation does not implement PartialEq; compare debug spellings.
        assert_eq!(
            format!("{:?}", parse_rotation("hourly")),
            format!("{:?}", Rotation::HOURLY)
        );
        assert_eq!(
            format!("{:?}", parse_rotation("NEVER")),
            format!("{:?}", Rotation::NEVER)
        );
    }

    #[test]
    fn test_parse_rotation_unknown_defaults_to_daily() {
        assert_eq!(
            format!("{:?}", parse_rotation("weekly")),
            format!("{:?}", Rotation::DAILY)
        );
    }

    #[test]
    fn test_log_filename_constant() {
        assert_eq!(LOG_FILENAME, "drivedup-daemon.log");
    }
}
