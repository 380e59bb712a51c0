//! `tracing` subscriber setup for the binary.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable with a `tracing` filter directive for this crate.
pub const LOG_ENV: &str = "DEALFLOW_LOG";

/// Pick the filter directive: `--verbose` forces debug, then `DEALFLOW_LOG`,
/// then `RUST_LOG`, then the configured level.
pub fn filter_directive(verbose: bool, configured_level: &str) -> String {
    if verbose {
        return "debug".to_string();
    }
    [LOG_ENV, "RUST_LOG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.trim().is_empty())
        .unwrap_or_else(|| configured_level.to_string())
}

/// Install the global subscriber. Logs go to stderr so command output on
/// stdout stays clean. Only the first call in a process installs anything.
pub fn init(verbose: bool, configured_level: &str) {
    let directive = filter_directive(verbose, configured_level);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()
        .ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        std::env::remove_var(LOG_ENV);
        std::env::remove_var("RUST_LOG");
    }

    #[test]
    #[serial]
    fn test_verbose_wins() {
        clear_env();
        std::env::set_var(LOG_ENV, "warn");
        assert_eq!(filter_directive(true, "info"), "debug");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_env_precedence() {
        clear_env();
        assert_eq!(filter_directive(false, "info"), "info");

        std::env::set_var("RUST_LOG", "trace");
        assert_eq!(filter_directive(false, "info"), "trace");

        std::env::set_var(LOG_ENV, "dealflow=debug");
        assert_eq!(filter_directive(false, "info"), "dealflow=debug");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_init_twice_is_a_no_op() {
        clear_env();
        init(false, "info");
        init(true, "info");
    }
}
