//! Strategy Parameters
//!
//! Configuration structs for the SuperTrend options strategy.
//! Every field is fixed at construction; defaults match the production rule set.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Entry confidence required to open a position
pub const MIN_ENTRY_CONFIDENCE: f64 = 65.0;

/// Runtime confidence at or below which an open position is closed
pub const MIN_RUNTIME_CONFIDENCE: f64 = 40.0;

/// Exchange-local time after which open positions are force-closed (15:20 IST)
pub const DEFAULT_EOD_CUTOFF: NaiveTime = match NaiveTime::from_hms_opt(15, 20, 0) {
    Some(t) => t,
    None => panic!("invalid EOD cutoff"),
};

/// Main strategy configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    pub regime: RegimeConfig,
    pub confidence: ConfidenceConfig,
    pub cooldown: CooldownConfig,
    pub exit: ExitConfig,
}

impl StrategyConfig {
    /// Switch regime detection to the ADX method with the given threshold
    pub fn with_adx(mut self, threshold: f64) -> Self {
        self.regime.use_adx = true;
        self.regime.adx_threshold = threshold;
        self
    }

    pub fn with_cooldown(mut self, candles: u32) -> Self {
        self.cooldown.cooldown_candles = candles;
        self
    }

    pub fn with_eod_bypass(mut self, bypass: bool) -> Self {
        self.exit.bypass_eod_exit = bypass;
        self
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), ParamsError> {
        self.regime.validate()?;
        self.confidence.validate()?;
        Ok(())
    }
}

/// Market regime gate settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeConfig {
    /// Classify with ADX when a reading is available
    pub use_adx: bool,
    /// ADX at or above this is trending
    pub adx_threshold: f64,
    /// Price-to-SuperTrend distance (%) below which the market is sideways
    pub st_distance_sideways_threshold_pct: f64,
}

impl Default for RegimeConfig {
    fn default() -> Self {
        Self {
            use_adx: false,
            adx_threshold: 20.0,
            st_distance_sideways_threshold_pct: 0.15,
        }
    }
}

impl RegimeConfig {
    pub fn validate(&self) -> Result<(), ParamsError> {
        if !self.adx_threshold.is_finite()
            || self.adx_threshold <= 0.0
            || self.adx_threshold > 100.0
        {
            return Err(ParamsError::InvalidAdxThreshold(self.adx_threshold));
        }
        if !self.st_distance_sideways_threshold_pct.is_finite()
            || self.st_distance_sideways_threshold_pct <= 0.0
        {
            return Err(ParamsError::InvalidDistanceThreshold(
                self.st_distance_sideways_threshold_pct,
            ));
        }
        Ok(())
    }
}

/// Confidence gates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceConfig {
    pub min_entry_confidence: f64,
    pub min_runtime_confidence: f64,
    /// Candles held before time decay starts eroding runtime confidence
    pub decay_after_candles: u32,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            min_entry_confidence: MIN_ENTRY_CONFIDENCE,
            min_runtime_confidence: MIN_RUNTIME_CONFIDENCE,
            decay_after_candles: 10,
        }
    }
}

impl ConfidenceConfig {
    pub fn validate(&self) -> Result<(), ParamsError> {
        if !(0.0..=100.0).contains(&self.min_entry_confidence) {
            return Err(ParamsError::InvalidConfidence(
                "min_entry_confidence",
                self.min_entry_confidence,
            ));
        }
        if !(0.0..=100.0).contains(&self.min_runtime_confidence) {
            return Err(ParamsError::InvalidConfidence(
                "min_runtime_confidence",
                self.min_runtime_confidence,
            ));
        }
        if self.min_runtime_confidence > self.min_entry_confidence {
            return Err(ParamsError::RuntimeAboveEntry {
                runtime: self.min_runtime_confidence,
                entry: self.min_entry_confidence,
            });
        }
        Ok(())
    }
}

/// Post-exit cooldown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CooldownConfig {
    pub cooldown_candles: u32,
}

impl Default for CooldownConfig {
    fn default() -> Self {
        Self { cooldown_candles: 3 }
    }
}

/// Exit rule settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitConfig {
    pub eod_cutoff: NaiveTime,
    /// Skip the end-of-day exit (positional / testing mode)
    pub bypass_eod_exit: bool,
}

impl Default for ExitConfig {
    fn default() -> Self {
        Self {
            eod_cutoff: DEFAULT_EOD_CUTOFF,
            bypass_eod_exit: false,
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParamsError {
    #[error("Invalid ADX threshold: {0} (must be 0 < adx <= 100)")]
    InvalidAdxThreshold(f64),
    #[error("Invalid ST distance threshold: {0}% (must be > 0)")]
    InvalidDistanceThreshold(f64),
    #[error("Invalid {0}: {1} (must be 0-100)")]
    InvalidConfidence(&'static str, f64),
    #[error("Runtime confidence minimum {runtime} exceeds entry minimum {entry}")]
    RuntimeAboveEntry { runtime: f64, entry: f64 },
}
