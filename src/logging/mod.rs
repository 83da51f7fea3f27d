//! Diagnostic logging: console stream plus a size-rotated log file

mod rotating;

pub use rotating::{RotatingFileGuard, RotatingFileWriter};

use std::path::PathBuf;

use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub dir: PathBuf,
    pub file_name: String,
    /// Rotate once the file would exceed this many bytes (0 disables rotation)
    pub max_bytes: u64,
    pub max_backups: usize,
    /// Filter used when `RUST_LOG` is not set
    pub default_filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            dir: std::env::var("LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("logs")),
            file_name: std::env::var("LOG_FILE").unwrap_or_else(|_| "api.log".to_string()),
            max_bytes: std::env::var("LOG_MAX_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5_000_000),
            max_backups: std::env::var("LOG_BACKUPS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3),
            default_filter: "breast_cancer_api=info,tower_http=info".to_string(),
        }
    }
}

impl LogConfig {
    pub fn file_path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }
}

/// Install the global subscriber.
///
/// Every event goes both to stdout and to the rotating file. Returns the
/// file writer so callers can report where logs are kept.
pub fn init_logging(config: &LogConfig) -> anyhow::Result<RotatingFileWriter> {
    let writer = RotatingFileWriter::new(config.file_path(), config.max_bytes, config.max_backups)?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.default_filter))?;
    let timer = ChronoLocal::new(TIMESTAMP_FORMAT.to_string());

    let console_layer = fmt::layer().with_timer(timer.clone()).with_target(false);
    let file_layer = fmt::layer()
        .with_timer(timer)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer.clone());

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    Ok(writer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_path() {
        let config = LogConfig {
            dir: PathBuf::from("/var/log/bc"),
            file_name: "api.log".to_string(),
            ..Default::default()
        };
        assert_eq!(config.file_path(), PathBuf::from("/var/log/bc/api.log"));
    }

    #[test]
    fn test_default_rotation_limits() {
        let config = LogConfig::default();
        if std::env::var("LOG_MAX_BYTES").is_err() {
            assert_eq!(config.max_bytes, 5_000_000);
        }
        if std::env::var("LOG_BACKUPS").is_err() {
            assert_eq!(config.max_backups, 3);
        }
    }
}
