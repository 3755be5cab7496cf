//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Environment variable that overrides the configured filter.
pub const LOG_ENV_VAR: &str = "GATEHOUSE_LOG";

/// Install a global fmt subscriber. Returns `false` if one was already set.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.is_ok()
}
