//! Tracing subscriber setup for the CLI.
//!
//! The filter comes from `DREAMCAR_LOG` when set, otherwise from
//! `[logging] level`. Output goes to stderr so stdout stays clean for
//! `--json` output.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

pub const LOG_ENV: &str = "DREAMCAR_LOG";

pub fn init(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
