//! Logging initialization with optional file output

use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer, filter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Target for the run's final outcome. The binary prints the outcome to
/// stderr itself, so the console layer skips this target and only the log
/// file records it.
pub const OUTCOME_TARGET: &str = "imu_sync::outcome";

/// Default filter directive for a verbosity count (`-v`, `-vv`, ...).
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "imu_sync=info,security=info,warn",
        1 => "imu_sync=debug,security=info,info",
        2 => "imu_sync=trace,security=debug,debug",
        _ => "trace",
    }
}

/// Initialize logging with optional file output.
///
/// `RUST_LOG` wins over the verbosity-derived default when it is set.
/// Returns a guard that must be kept alive for the duration of the program.
pub fn init_logging(verbosity: u8, log_dir: Option<PathBuf>) -> Option<WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_filter(filter::filter_fn(|meta| !is_outcome(meta.target())));

    match log_dir {
        Some(dir) => {
            // Daily rotating log file
            let file_appender = tracing_appender::rolling::daily(&dir, "imu-sync.log");
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
        None => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(console_layer)
                .init();
            None
        }
    }
}

fn is_outcome(target: &str) -> bool {
    target == OUTCOME_TARGET
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_directives_parse() {
        for level in 0..5 {
            let directive = default_directive(level);
            assert!(
                EnvFilter::try_new(directive).is_ok(),
                "directive for -v x{level} should parse: {directive}"
            );
        }
    }

    #[test]
    fn outcome_target_is_kept_off_the_console() {
        assert!(is_outcome(OUTCOME_TARGET));
        assert!(!is_outcome("imu_sync"));
        assert!(!is_outcome("imu_sync::outcome::detail"));
    }

    #[test]
    fn quiet_default_keeps_crate_at_info() {
        assert!(default_directive(0).starts_with("imu_sync=info"));
    }
}
