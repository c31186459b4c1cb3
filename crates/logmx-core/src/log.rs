//! Diagnostic logging setup.
//!
//! Installs a `tracing` subscriber for the records loggers emit and for
//! logmx's own diagnostics (such as registration failures). `RUST_LOG`, when
//! set, takes precedence over the configured filter.

use logmx_types::config::{LogConfig, LogFormat};
use logmx_types::{LogMxError, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

/// Initialize the logging system with default configuration.
pub fn init_default() -> Result<()> {
    init_from_config(&LogConfig::default()).map(|_| ())
}

/// Initialize logging from configuration.
///
/// When `directory` is set, output goes to a daily-rolling file through a
/// background writer; keep the returned guard alive to flush it on exit.
pub fn init_from_config(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => build_filter(&config.filter)?,
    };

    let (writer, guard) = match &config.directory {
        Some(directory) => {
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(config.file_prefix.as_str())
                .build(directory)
                .map_err(|e| {
                    LogMxError::Config(format!("Failed to open log directory {}: {}", directory.display(), e))
                })?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(writer), Some(guard))
        }
        None => (BoxMakeWriter::new(std::io::stderr), None),
    };

    let base = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(config.ansi && config.directory.is_none());

    let layer: Box<dyn Layer<Registry> + Send + Sync> = match config.format {
        LogFormat::Pretty => base.pretty().with_filter(filter).boxed(),
        LogFormat::Json => base.json().with_filter(filter).boxed(),
        LogFormat::Compact => base.compact().with_filter(filter).boxed(),
    };

    tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .map_err(|e| LogMxError::Config(format!("Failed to install log subscriber: {}", e)))?;

    Ok(guard)
}

fn build_filter(directives: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directives)
        .map_err(|e| LogMxError::Config(format!("Invalid log filter '{}': {}", directives, e)))
}
