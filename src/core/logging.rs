use std::path::Path;
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, EnvFilter};

/// Daily-rotated file inside the configured log directory.
pub const LOG_FILE_PREFIX: &str = "server.log";

/// Request spans from the HTTP layer stay visible while the database
/// drivers only report problems.
const DEFAULT_DIRECTIVES: &str = "info,tower_http=debug,sqlx=warn,mongodb=warn";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Installs the global subscriber: stdout plus `<log_dir>/server.log.<date>`.
///
/// When the directory cannot be created the file layer is skipped and a
/// warning is emitted through the stdout layer.
pub fn init(log_dir: &Path) -> Result<(), TryInitError> {
    let dir_error = std::fs::create_dir_all(log_dir).err();

    let file_layer = if dir_error.is_none() {
        let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = LOG_GUARD.set(guard);
        Some(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer),
        )
    } else {
        None
    };

    let filter = EnvFilter::new(filter_directives(std::env::var("RUST_LOG").ok()));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(file_layer)
        .try_init()?;

    if let Some(err) = dir_error {
        tracing::warn!(
            "Logging to stdout only; cannot create {}: {}",
            log_dir.display(),
            err
        );
    }
    Ok(())
}

fn filter_directives(from_env: Option<String>) -> String {
    from_env
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
        .unwrap_or_else(|| DEFAULT_DIRECTIVES.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rust_log_overrides_defaults() {
        assert_eq!(filter_directives(Some(" debug ".to_string())), "debug");
    }

    #[test]
    fn blank_or_missing_rust_log_uses_defaults() {
        assert_eq!(filter_directives(None), DEFAULT_DIRECTIVES);
        assert_eq!(filter_directives(Some("  ".to_string())), DEFAULT_DIRECTIVES);
    }
}
