//! Configuration Loader
//!
//! Loads and validates the strategy TOML file. Every section and key is
//! optional; anything missing takes the strategy default.

use chrono::NaiveTime;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::strategy::params::{
    ConfidenceConfig, CooldownConfig, ExitConfig, ParamsError, RegimeConfig, StrategyConfig,
    DEFAULT_EOD_CUTOFF,
};

/// Env var forcing the end-of-day exit off (`1` / `true`)
pub const BYPASS_EOD_ENV: &str = "OPTIONS_CORE_BYPASS_EOD";

/// Main configuration structure matching the TOML file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub regime: RegimeSection,
    pub confidence: ConfidenceSection,
    pub cooldown: CooldownSection,
    pub exit: ExitSection,
    pub logging: LoggingSection,
}

/// Market regime gate section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegimeSection {
    /// Use ADX instead of ST distance when a reading is available
    pub use_adx: bool,
    pub adx_threshold: f64,
    /// ST distance (%) below which the market is sideways
    pub st_distance_sideways_threshold_pct: f64,
}

impl Default for RegimeSection {
    fn default() -> Self {
        let d = RegimeConfig::default();
        Self {
            use_adx: d.use_adx,
            adx_threshold: d.adx_threshold,
            st_distance_sideways_threshold_pct: d.st_distance_sideways_threshold_pct,
        }
    }
}

/// Confidence gates section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConfidenceSection {
    pub min_entry_confidence: f64,
    pub min_runtime_confidence: f64,
    pub decay_after_candles: u32,
}

impl Default for ConfidenceSection {
    fn default() -> Self {
        let d = ConfidenceConfig::default();
        Self {
            min_entry_confidence: d.min_entry_confidence,
            min_runtime_confidence: d.min_runtime_confidence,
            decay_after_candles: d.decay_after_candles,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CooldownSection {
    pub cooldown_candles: u32,
}

impl Default for CooldownSection {
    fn default() -> Self {
        Self {
            cooldown_candles: CooldownConfig::default().cooldown_candles,
        }
    }
}

/// Exit rules section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExitSection {
    /// Exchange-local cutoff, "HH:MM" or "HH:MM:SS"
    pub eod_cutoff: String,
    pub bypass_eod_exit: bool,
}

impl Default for ExitSection {
    fn default() -> Self {
        Self {
            eod_cutoff: DEFAULT_EOD_CUTOFF.format("%H:%M").to_string(),
            bypass_eod_exit: false,
        }
    }
}

impl ExitSection {
    /// Bypass flag with environment variable override.
    /// Checks OPTIONS_CORE_BYPASS_EOD first, falls back to config value
    pub fn get_bypass_eod_exit(&self) -> bool {
        let env = std::env::var(BYPASS_EOD_ENV).ok();
        bypass_from_env(env.as_deref(), self.bypass_eod_exit)
    }

    pub fn parse_eod_cutoff(&self) -> Result<NaiveTime, ConfigError> {
        let raw = self.eod_cutoff.trim();
        NaiveTime::parse_from_str(raw, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
            .map_err(|_| {
                ConfigError::ValidationError(format!(
                    "eod_cutoff must be HH:MM[:SS], got {:?}",
                    raw
                ))
            })
    }
}

/// Resolve the bypass flag from a raw env value, or `fallback` when unset
fn bypass_from_env(value: Option<&str>, fallback: bool) -> bool {
    match value {
        Some(v) => matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"),
        None => fallback,
    }
}

/// Logging configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "trace", "debug", "info", "warn", "error"
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Invalid strategy parameters: {0}")]
    ParamsError(#[from] ParamsError),
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.exit.parse_eod_cutoff()?;

        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "logging.level cannot be empty".to_string(),
            ));
        }

        self.to_strategy_config()?.validate()?;
        Ok(())
    }

    /// Build the typed strategy configuration
    pub fn to_strategy_config(&self) -> Result<StrategyConfig, ConfigError> {
        Ok(StrategyConfig {
            regime: RegimeConfig {
                use_adx: self.regime.use_adx,
                adx_threshold: self.regime.adx_threshold,
                st_distance_sideways_threshold_pct: self.regime.st_distance_sideways_threshold_pct,
            },
            confidence: ConfidenceConfig {
                min_entry_confidence: self.confidence.min_entry_confidence,
                min_runtime_confidence: self.confidence.min_runtime_confidence,
                decay_after_candles: self.confidence.decay_after_candles,
            },
            cooldown: CooldownConfig {
                cooldown_candles: self.cooldown.cooldown_candles,
            },
            exit: ExitConfig {
                eod_cutoff: self.exit.parse_eod_cutoff()?,
                bypass_eod_exit: self.exit.get_bypass_eod_exit(),
            },
        })
    }
}

impl TryFrom<&Config> for StrategyConfig {
    type Error = ConfigError;

    fn try_from(config: &Config) -> Result<Self, Self::Error> {
        config.to_strategy_config()
    }
}
