//! Tracing and error logging setup.
//!
//! Console output follows `LOG_LEVEL`. ERROR events additionally go to the
//! sink selected by `ERROR_LOGGING`: a JSON `errors.log` file, or the remote
//! error tracker when a DSN is configured.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, EnvFilter};

use crate::config::{
    ErrorLogging, Settings, ERROR_LOG_FILE_NAME, KEY_SENTRY_DSN, REMOTE_TRACES_SAMPLE_RATE,
};
use crate::errors::{ConfigError, ConfigResult};

/// Destination for ERROR-level events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorSink {
    File(PathBuf),
    Remote(String),
    Disabled,
}

impl ErrorSink {
    /// Remote mode without a DSN falls back to disabled.
    pub fn from_settings(settings: &Settings) -> Self {
        match settings.error_logging {
            ErrorLogging::Remote if !settings.sentry_dsn.trim().is_empty() => {
                ErrorSink::Remote(settings.sentry_dsn.trim().to_string())
            }
            ErrorLogging::File => ErrorSink::File(settings.error_log_dir.clone()),
            _ => ErrorSink::Disabled,
        }
    }
}

/// Keeps the background log writer and the error tracker client alive.
///
/// Dropping it flushes pending events.
#[must_use]
pub struct LoggingGuard {
    _file: Option<WorkerGuard>,
    _remote: Option<sentry::ClientInitGuard>,
}

/// Translate a `LOG_LEVEL` value into a filter directive.
///
/// Accepts the usual upper-case names, including `WARNING` and `CRITICAL`.
pub fn level_directive(log_level: &str) -> String {
    match log_level.trim().to_ascii_lowercase().as_str() {
        "warning" => "warn".to_string(),
        "critical" | "fatal" => "error".to_string(),
        other => other.to_string(),
    }
}

/// Initialize the global tracing subscriber from settings.
///
/// `RUST_LOG` overrides `LOG_LEVEL`; `verbose` overrides both.
pub fn init(settings: &Settings, verbose: bool) -> ConfigResult<LoggingGuard> {
    let directive = if verbose {
        "debug".to_string()
    } else {
        std::env::var("RUST_LOG").unwrap_or_else(|_| level_directive(&settings.log_level))
    };
    let env_filter = EnvFilter::try_new(&directive)
        .map_err(|e| ConfigError::logging(format!("invalid log level '{}': {}", directive, e)))?;

    let sink = ErrorSink::from_settings(settings);

    let (file_layer, file_guard) = match &sink {
        ErrorSink::File(dir) => {
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::NEVER)
                .filename_prefix(ERROR_LOG_FILE_NAME)
                .build(dir)
                .map_err(|e| ConfigError::logging(format!("cannot open error log: {}", e)))?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .json()
                .with_writer(writer)
                .with_filter(LevelFilter::ERROR);
            (Some(layer), Some(guard))
        }
        _ => (None, None),
    };

    let remote_guard = match &sink {
        ErrorSink::Remote(dsn) => Some(init_remote(settings, dsn)?),
        _ => None,
    };
    let remote_layer = remote_guard.as_ref().map(|_| {
        sentry_tracing::layer().event_filter(|meta| match *meta.level() {
            tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
            tracing::Level::WARN => sentry_tracing::EventFilter::Breadcrumb,
            _ => sentry_tracing::EventFilter::Ignore,
        })
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .with(remote_layer)
        .try_init()
        .map_err(|e| ConfigError::logging(e.to_string()))?;

    match &sink {
        ErrorSink::File(dir) => tracing::info!(
            "File error logging initialized: {}",
            dir.join(ERROR_LOG_FILE_NAME).display()
        ),
        ErrorSink::Remote(_) => tracing::info!("Remote error logging initialized"),
        ErrorSink::Disabled => tracing::info!("Error logging disabled"),
    }

    Ok(LoggingGuard {
        _file: file_guard,
        _remote: remote_guard,
    })
}

fn init_remote(settings: &Settings, dsn: &str) -> ConfigResult<sentry::ClientInitGuard> {
    let dsn = dsn
        .parse::<sentry::types::Dsn>()
        .map_err(|e| ConfigError::invalid(KEY_SENTRY_DSN, dsn, e.to_string()))?;

    Ok(sentry::init(sentry::ClientOptions {
        dsn: Some(dsn),
        release: sentry::release_name!(),
        environment: Some(settings.environment().into()),
        traces_sample_rate: REMOTE_TRACES_SAMPLE_RATE,
        ..Default::default()
    }))
}
