//! Structured logging setup
//!
//! Console output goes to stderr so report tables on stdout stay clean. A
//! daily rolling file in the logs directory keeps the full trail.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::paths::BackofficePaths;

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "warn,backoffice_cli=info";

/// Install the global subscriber
///
/// Returns the file writer guard; keep it alive until exit so buffered lines
/// are flushed. When the log directory can't be created only the console
/// layer is installed.
pub fn init(paths: &BackofficePaths, verbose: bool) -> Option<WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("info,backoffice_cli=debug")
        } else {
            EnvFilter::new(DEFAULT_FILTER)
        }
    });

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let log_dir = paths.log_dir();
    if std::fs::create_dir_all(&log_dir).is_err() {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .init();
        return None;
    }

    let file_appender = tracing_appender::rolling::daily(&log_dir, "backoffice");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Some(guard)
}
