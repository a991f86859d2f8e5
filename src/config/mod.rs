//! Configuration Module
//!
//! Loads and validates strategy configuration from TOML files.

pub mod loader;

pub use loader::{
    load_config, parse_config, Config, ConfigError, LoggingSection, BYPASS_EOD_ENV,
};
