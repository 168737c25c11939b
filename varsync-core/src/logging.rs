//! Logging setup for VarSync, built on the `tracing` ecosystem.
//!
//! Two entry points:
//! - [`init_minimal_logging`] for tests and early startup (stderr, `RUST_LOG`).
//! - [`init_logging`] for configured output: stdout plus an optional
//!   daily-rolling log file, as text or JSON.

use crate::config::LoggingConfig;
use crate::error::CoreError;
use crate::utils::paths;

use once_cell::sync::Lazy;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Keeps the non-blocking file writer alive so buffered lines are flushed.
static LOG_WORKER_GUARD: Lazy<Mutex<Option<WorkerGuard>>> = Lazy::new(|| Mutex::new(None));

/// Installs a stderr subscriber filtered by `RUST_LOG` (default "info").
///
/// Safe to call repeatedly; later calls are ignored.
pub fn init_minimal_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()));

    let _ = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .try_init();
}

fn parse_level(level: &str) -> Result<Level, CoreError> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        other => Err(CoreError::LoggingInitialization(format!("Invalid log level in config: {}", other))),
    }
}

/// Resolves relative log paths against the application state directory.
fn resolve_log_path(path: &Path) -> Result<PathBuf, CoreError> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(paths::get_app_state_dir()?.join(path))
    }
}

fn create_file_layer(log_path: &Path, format: &str) -> Result<(BoxedLayer, WorkerGuard), CoreError> {
    let directory = log_path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| Path::new("."));
    paths::ensure_dir_exists(directory)?;

    let file_name = log_path
        .file_name()
        .ok_or_else(|| CoreError::InvalidInput(format!("Log path {:?} has no file name", log_path)))?;
    let appender = tracing_appender::rolling::daily(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer: BoxedLayer = if format.eq_ignore_ascii_case("json") {
        fmt::layer().json().with_writer(writer).with_ansi(false).boxed()
    } else {
        fmt::layer().with_writer(writer).with_ansi(false).boxed()
    };
    Ok((layer, guard))
}

/// Installs the global subscriber described by `config`.
///
/// With `is_reload` set, a failure to replace an already installed subscriber
/// is reported on stderr instead of returned.
///
/// # Errors
///
/// [`CoreError::LoggingInitialization`] for an invalid level or when a global
/// subscriber is already installed on first initialization.
pub fn init_logging(config: &LoggingConfig, is_reload: bool) -> Result<(), CoreError> {
    let level = parse_level(&config.level)?;

    let stdout_layer: BoxedLayer = if config.format.eq_ignore_ascii_case("json") {
        fmt::layer()
            .json()
            .with_writer(std::io::stdout)
            .with_ansi(false)
            .with_filter(EnvFilter::new(level.to_string()))
            .boxed()
    } else {
        fmt::layer()
            .with_writer(std::io::stdout)
            .with_ansi(atty::is(atty::Stream::Stdout))
            .with_filter(EnvFilter::new(level.to_string()))
            .boxed()
    };

    let mut layers: Vec<BoxedLayer> = vec![stdout_layer];
    let mut file_guard = None;
    if let Some(path) = &config.file_path {
        let path = resolve_log_path(path)?;
        let (file_layer, guard) = create_file_layer(&path, &config.format)?;
        layers.push(file_layer.with_filter(EnvFilter::new(level.to_string())).boxed());
        file_guard = Some(guard);
    }

    let result = Registry::default().with(layers).try_init();

    match LOG_WORKER_GUARD.lock() {
        Ok(mut slot) => *slot = file_guard,
        Err(e) => eprintln!("[ERROR] Failed to store log worker guard: {}", e),
    }

    match result {
        Ok(()) => Ok(()),
        Err(e) if is_reload => {
            eprintln!("[INFO] Logging re-initialization attempted; previous subscriber stays active: {}", e);
            Ok(())
        }
        Err(e) => Err(CoreError::LoggingInitialization(format!(
            "Failed to set global tracing subscriber: {}",
            e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_minimal_logging_is_idempotent() {
        init_minimal_logging();
        init_minimal_logging();
        tracing::info!("minimal logging active");
    }

    #[test]
    fn test_parse_level_rejects_unknown() {
        assert_eq!(parse_level("WARN").unwrap(), Level::WARN);
        assert!(matches!(parse_level("verbose"), Err(CoreError::LoggingInitialization(_))));
    }

    #[test]
    fn test_create_file_layer_creates_parent_dir() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("nested").join("sync.log");

        let (_layer, _guard) = create_file_layer(&log_path, "json").unwrap();
        assert!(log_path.parent().unwrap().is_dir());
    }

    #[test]
    fn test_init_logging_invalid_level() {
        let config = LoggingConfig { level: "loud".to_string(), ..LoggingConfig::default() };
        assert!(init_logging(&config, false).is_err());
    }

    #[test]
    fn test_resolve_log_path_keeps_absolute() {
        let temp_dir = TempDir::new().unwrap();
        let absolute = temp_dir.path().join("a.log");
        assert_eq!(resolve_log_path(&absolute).unwrap(), absolute);
    }
}
