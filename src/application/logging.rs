//! Logging setup for processes embedding the decision core.

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingSection;

/// Install a fmt subscriber at the configured level.
///
/// `RUST_LOG` wins over the config when set. Returns `false` if a global
/// subscriber was already installed.
pub fn init_logging(section: &LoggingSection) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(section.level.trim()))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).try_init().is_ok()
}
