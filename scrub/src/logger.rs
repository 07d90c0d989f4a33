// scrub/src/logger.rs
//! Logger setup for the scrub binary and its tests.
//!
//! Logs go to stderr through `env_logger`, so they never mix with redacted
//! output on stdout. `RUST_LOG` is honored unless a level is forced.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Default filter when neither `RUST_LOG` nor a forced level is present.
const DEFAULT_FILTER: &str = "warn";

/// Initializes the global logger. Safe to call more than once; later calls are no-ops.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = match level {
        Some(level) => {
            let mut forced = Builder::new();
            forced.filter_level(level);
            forced
        }
        None => Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER)),
    };
    builder.format_timestamp(None);
    let _ = builder.try_init();
}
