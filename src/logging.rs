use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Name prefix of the daily rolling log files
pub const LOG_FILE_PREFIX: &str = "bitpos.log";

/// Builds the level filter
///
/// `RUST_LOG` wins when set; otherwise `debug` or `info` for this crate and
/// `warn` for everything else.
pub fn env_filter(debug: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if debug { "debug" } else { "info" };
        EnvFilter::new(format!("warn,bitpos={level},tower_http={level}"))
    })
}

/// Installs the global subscriber
///
/// Human-readable lines go to stdout. When `log_dir` is given, JSON lines
/// also go to a daily rolling file there; keep the returned guard alive
/// until shutdown so buffered lines are flushed.
pub fn init_logging(debug: bool, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(env_filter(debug))
                .with(stdout_layer)
                .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(env_filter(debug))
                .with(stdout_layer)
                .init();
            None
        }
    }
}
