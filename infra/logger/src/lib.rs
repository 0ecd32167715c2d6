//! # Logger
//!
//! Installs the global `tracing` subscriber for the page behaviors and the `folio` binary.
//!
//! * Console output goes to **stderr** so command output on stdout stays machine-readable.
//! * File output uses a rolling appender behind a non-blocking writer; keep the returned
//!   [`Logger`] alive until shutdown so buffered lines are flushed.
//! * The level comes from [`LoggingConfig::level`]; `RUST_LOG` still applies unless an
//!   explicit [`LoggerBuilder::env_filter`] is set.
//!
//! ## Example
//!
//! ```rust
//! use folio_logger::{LevelFilter, Logger};
//!
//! let _logger = Logger::builder()
//!     .name("folio")
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use folio_domain::config::{LogRotation, LoggingConfig};
pub use tracing::level_filters::LevelFilter;

use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const LOG_FILE_SUFFIX: &str = "log";

/// Configures and installs the global tracing subscriber.
///
/// Starts from [`LoggingConfig::default`] (or a loaded config via [`Logger::from_config`]);
/// every setter overrides one field.
#[derive(Debug, Clone)]
pub struct LoggerBuilder {
    config: LoggingConfig,
}

impl LoggerBuilder {
    /// Sets the name used as the rolling file prefix.
    #[must_use = "Settings only apply once `init` is called"]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Sets the minimum level emitted.
    #[must_use = "Settings only apply once `init` is called"]
    pub fn level(mut self, level: LevelFilter) -> Self {
        self.config.level = level.to_string().to_lowercase();
        self
    }

    /// Adds an explicit filter (e.g., `folio_alerts=debug,folio_dom=warn`).
    ///
    /// When set, `RUST_LOG` is ignored. Invalid filters make [`LoggerBuilder::init`] fail.
    #[must_use = "Settings only apply once `init` is called"]
    pub fn env_filter(mut self, filter: impl Into<String>) -> Self {
        self.config.env_filter = Some(filter.into());
        self
    }

    /// Enables or disables console logging on stderr.
    #[must_use = "Settings only apply once `init` is called"]
    pub const fn console(mut self, enabled: bool) -> Self {
        self.config.console = enabled;
        self
    }

    /// Writes rolling log files into `path`.
    #[must_use = "Settings only apply once `init` is called"]
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.path = Some(path.into());
        self
    }

    #[must_use = "Settings only apply once `init` is called"]
    pub const fn rotation(mut self, rotation: LogRotation) -> Self {
        self.config.rotation = rotation;
        self
    }

    #[must_use = "Settings only apply once `init` is called"]
    pub const fn max_files(mut self, max: usize) -> Self {
        self.config.max_files = max;
        self
    }

    /// Emits JSON lines instead of the compact text format.
    #[must_use = "Settings only apply once `init` is called"]
    pub const fn json(mut self, enabled: bool) -> Self {
        self.config.json = enabled;
        self
    }

    /// The settings [`LoggerBuilder::init`] would apply.
    #[must_use]
    pub const fn config(&self) -> &LoggingConfig {
        &self.config
    }

    /// Consumes the builder and initializes the global tracing subscriber.
    ///
    /// # Returns
    /// A [`Logger`] handle. **Note:** it owns the [`WorkerGuard`] of the file writer and must
    /// outlive every log call that should reach the file.
    ///
    /// # Errors
    /// Returns [`LoggerError::Subscriber`] if a global subscriber has already been set and
    /// [`LoggerError::InvalidConfiguration`] for invalid settings.
    pub fn init(self) -> Result<Logger, LoggerError> {
        let config = self.config;
        validate_config(&config)?;
        let env_filter = build_env_filter(&config)?;

        let mut layers = Vec::new();

        if config.console {
            let console = layer().with_writer(std::io::stderr).with_target(false);
            let boxed = if config.json {
                console.json().boxed()
            } else {
                console.compact().with_ansi(true).boxed()
            };
            layers.push(boxed);
        }

        let guard = if let Some(path) = &config.path {
            fs::create_dir_all(path).map_err(|e| LoggerError::Internal {
                message: e.to_string().into(),
                context: Some(format!("Failed to create path: {}", path.display()).into()),
            })?;

            let file_appender = RollingFileAppender::builder()
                .rotation(rotation(config.rotation))
                .filename_prefix(&config.name)
                .filename_suffix(LOG_FILE_SUFFIX)
                .max_log_files(config.max_files)
                .build(path)?;

            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let file_layer = layer().with_writer(non_blocking).with_ansi(false);
            let boxed = if config.json { file_layer.json().boxed() } else { file_layer.boxed() };

            layers.push(boxed);
            Some(guard)
        } else {
            None
        };

        if layers.is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "No logging layers enabled. Enable console or file output.".into(),
                context: None,
            });
        }

        tracing_subscriber::registry().with(env_filter).with(layers).try_init()?;
        tracing::debug!(name = %config.name, level = %config.level, "Logger initialized");

        Ok(Logger { guard })
    }
}

/// A handle to the initialized logging system.
///
/// Holds the background file writer's guard. Drop it only when the program shuts down.
#[must_use = "Dropping this handle will stop background logging threads."]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    /// A builder with default settings: console on, level `info`, no files.
    #[must_use = "Settings only apply once `init` is called"]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder { config: LoggingConfig::default() }
    }

    /// A builder seeded from a loaded `[logging]` config section.
    #[must_use = "Settings only apply once `init` is called"]
    pub fn from_config(config: &LoggingConfig) -> LoggerBuilder {
        LoggerBuilder { config: config.clone() }
    }

    /// Whether a file writer is attached.
    #[must_use]
    pub const fn has_file_output(&self) -> bool {
        self.guard.is_some()
    }

    /// The file writer guard, if file output is enabled.
    #[must_use]
    pub const fn guard(&self) -> Option<&WorkerGuard> {
        self.guard.as_ref()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::debug!("Logging system shutting down, flushing buffers...");
        }
    }
}

/// Parses a level name such as `"warn"` or `"DEBUG"`.
///
/// # Errors
/// Returns [`LoggerError::InvalidConfiguration`] for unknown names.
pub fn parse_level(level: &str) -> Result<LevelFilter, LoggerError> {
    LevelFilter::from_str(level.trim()).map_err(|e| LoggerError::InvalidConfiguration {
        message: format!("Invalid log level '{level}': {e}").into(),
        context: None,
    })
}

const fn rotation(rotation: LogRotation) -> Rotation {
    match rotation {
        LogRotation::Minutely => Rotation::MINUTELY,
        LogRotation::Hourly => Rotation::HOURLY,
        LogRotation::Daily => Rotation::DAILY,
        LogRotation::Never => Rotation::NEVER,
    }
}

fn validate_config(config: &LoggingConfig) -> Result<(), LoggerError> {
    if config.name.trim().is_empty() {
        return Err(LoggerError::InvalidConfiguration {
            message: "Logger name cannot be empty".into(),
            context: None,
        });
    }

    if config.path.is_some() && config.max_files == 0 {
        return Err(LoggerError::InvalidConfiguration {
            message: "max_files must be greater than zero".into(),
            context: None,
        });
    }

    Ok(())
}

fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter, LoggerError> {
    let level = parse_level(&config.level)?;
    let builder = EnvFilter::builder().with_default_directive(level.into());
    config.env_filter.as_ref().map_or_else(
        || Ok(builder.from_env_lossy()),
        |filter| {
            builder.parse(filter).map_err(|e| LoggerError::InvalidConfiguration {
                message: format!("Invalid env filter '{filter}': {e}").into(),
                context: None,
            })
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn builder_starts_from_defaults() {
        let builder = Logger::builder().name("test-app").env_filter("folio=debug");
        assert!(builder.config().console);
        assert_eq!(builder.config().level, "info");
        assert_eq!(builder.config().env_filter.as_deref(), Some("folio=debug"));
        assert!(builder.config().path.is_none());
    }

    #[test]
    fn builder_overrides_loaded_config() {
        let loaded = LoggingConfig { level: "warn".into(), json: true, ..LoggingConfig::default() };
        let builder = Logger::from_config(&loaded).level(LevelFilter::TRACE).max_files(3);

        assert_eq!(builder.config().level, "trace");
        assert!(builder.config().json);
        assert_eq!(builder.config().max_files, 3);
    }

    #[test]
    fn levels_parse_case_insensitively() {
        assert_eq!(parse_level("WARN").unwrap(), LevelFilter::WARN);
        assert_eq!(parse_level(" debug ").unwrap(), LevelFilter::DEBUG);
        assert_eq!(parse_level("off").unwrap(), LevelFilter::OFF);
        assert!(matches!(parse_level("loud"), Err(LoggerError::InvalidConfiguration { .. })));
    }

    #[test]
    fn invalid_settings_fail_before_installing() {
        let err = Logger::builder().name("  ").init().unwrap_err();
        assert!(err.to_string().contains("name cannot be empty"), "{err}");

        let err = Logger::builder().console(false).init().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err = Logger::builder().env_filter("folio=[").init().unwrap_err();
        assert!(err.to_string().contains("Invalid env filter"), "{err}");
    }

    #[test]
    fn errors_carry_context() {
        let result: Result<(), LoggerError> = Err(LoggerError::Internal {
            message: "disk full".into(),
            context: None,
        });
        let err = result.context("opening log file").unwrap_err();
        assert_eq!(err.to_string(), "Internal logger error (opening log file): disk full");
    }

    #[test]
    #[serial]
    fn file_logging_setup() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempdir()?;
        let log_dir = tmp_dir.path().join("logs");

        let logger = Logger::builder()
            .name("test-app")
            .console(false)
            .path(&log_dir)
            .rotation(LogRotation::Never)
            .init()?;
        assert!(logger.has_file_output());

        tracing::info!("hello world");
        std::thread::sleep(Duration::from_millis(20));
        drop(logger);

        let has_log = fs::read_dir(&log_dir)?
            .flatten()
            .any(|entry| entry.path().extension().and_then(|e| e.to_str()) == Some("log"));
        assert!(has_log, "at least one log file should be created");
        Ok(())
    }
}
