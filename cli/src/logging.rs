//! Logging configuration with file-based output and size-based rotation.
//!
//! Writes logs to `~/.config/ownermap/ownermap.log` (or platform equivalent)
//! with 10 MB size-based rotation. Stdout carries the owner table, so console
//! logging goes to stderr and only shows errors unless `DEBUG_LOGGING=1`.

use rolling_file::{BasicRollingFileAppender, RollingConditionBasic};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const DEBUG_DIRECTIVES: &str = "ownermap_core=debug,ownermap_cli=debug";

/// Initialize logging with dual output (file + stderr).
///
/// Returns a `WorkerGuard` that must be held until exit so buffered file
/// output is flushed.
///
/// # Behavior
/// - **File output:** INFO+, DEBUG+ for ownermap crates when `DEBUG_LOGGING=1`
/// - **Stderr output:** ERROR only by default, same as file when `DEBUG_LOGGING=1`
/// - **Rotation:** Size-based at 10 MB, keeps only the latest rotated file
///
/// # Fallback
/// If the log directory cannot be created, returns `None` and logs to stderr only.
pub fn init() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let debug_logging = std::env::var("DEBUG_LOGGING").is_ok();

    let log_dir = match dirs::config_dir() {
        Some(config) => config.join("ownermap"),
        None => {
            init_stderr_only(debug_logging);
            return None;
        }
    };

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        // Subscriber not installed yet
        eprintln!(
            "Failed to create log directory {:?}: {}, using stderr only",
            log_dir, e
        );
        init_stderr_only(debug_logging);
        return None;
    }

    let log_path = log_dir.join("ownermap.log");
    let file_appender = match BasicRollingFileAppender::new(
        &log_path,
        RollingConditionBasic::new().max_size(10 * 1024 * 1024),
        1,
    ) {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("Failed to create log file at {:?}: {}", log_path, e);
            init_stderr_only(debug_logging);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_span_events(FmtSpan::NONE)
        .with_filter(EnvFilter::new(file_directive(debug_logging)));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::NONE)
        .with_filter(EnvFilter::new(stderr_directive(debug_logging)));

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .init();

    tracing::info!(
        log_file = ?log_path,
        debug_logging,
        "ownermap logging initialized"
    );

    Some(guard)
}

fn init_stderr_only(debug_logging: bool) {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::NONE)
        .with_filter(EnvFilter::new(stderr_directive(debug_logging)));

    tracing_subscriber::registry().with(stderr_layer).init();

    tracing::debug!(debug_logging, "ownermap logging initialized (stderr only)");
}

fn file_directive(debug_logging: bool) -> String {
    if debug_logging {
        format!("info,{DEBUG_DIRECTIVES}")
    } else {
        "info".to_string()
    }
}

fn stderr_directive(debug_logging: bool) -> String {
    if debug_logging {
        format!("warn,{DEBUG_DIRECTIVES}")
    } else {
        "error".to_string()
    }
}
