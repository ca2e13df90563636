//! Logging setup
//!
//! Log lines go to stderr so they never interleave with command output or
//! the interactive menu. `RUST_LOG` takes precedence over the settings file.

use tracing_subscriber::EnvFilter;

use crate::config::settings::Settings;

/// Build the filter: `RUST_LOG` if set, otherwise the configured level for
/// this crate and its binary
pub fn env_filter(settings: &Settings) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "expense_tracker={level},expenses={level}",
            level = settings.log_level
        ))
    })
}

/// Install the global subscriber
///
/// Returns `false` if a subscriber was already installed.
pub fn init_logging(settings: &Settings) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(settings))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok()
}
