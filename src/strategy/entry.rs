//! Entry Logic
//!
//! Ordered, short-circuiting gate. The first failing check names the reason:
//!
//! 1. Trending regime
//! 2. Previous SuperTrend direction known
//! 3. SuperTrend flipped
//! 4. Flip is -1 -> 1 (BULLISH) or 1 -> -1 (BEARISH)
//! 5. Close strictly beyond the SuperTrend line in the flip direction
//! 6. abs(MACD histogram) >= 0.5
//! 7. Entry confidence >= minimum

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::{EntryDirection, StDirection};
use crate::strategy::params::MIN_ENTRY_CONFIDENCE;

/// Minimum abs(MACD histogram) for an entry
pub const MACD_HIST_MIN: f64 = 0.5;

/// Outcome code for an entry evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryReason {
    Ok,
    SidewaysRegime,
    NoPrevSt,
    NoStFlip,
    InvalidStFlip,
    PriceNotAboveSt,
    PriceNotBelowSt,
    MacdHistTooSmall,
    LowEntryConfidence,
}

impl EntryReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryReason::Ok => "OK",
            EntryReason::SidewaysRegime => "SIDEWAYS_REGIME",
            EntryReason::NoPrevSt => "NO_PREV_ST",
            EntryReason::NoStFlip => "NO_ST_FLIP",
            EntryReason::InvalidStFlip => "INVALID_ST_FLIP",
            EntryReason::PriceNotAboveSt => "PRICE_NOT_ABOVE_ST",
            EntryReason::PriceNotBelowSt => "PRICE_NOT_BELOW_ST",
            EntryReason::MacdHistTooSmall => "MACD_HIST_TOO_SMALL",
            EntryReason::LowEntryConfidence => "LOW_ENTRY_CONFIDENCE",
        }
    }
}

impl fmt::Display for EntryReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntryDecision {
    pub should_enter: bool,
    pub direction: Option<EntryDirection>,
    pub reason: EntryReason,
}

impl EntryDecision {
    fn blocked(reason: EntryReason) -> Self {
        Self {
            should_enter: false,
            direction: None,
            reason,
        }
    }

    fn enter(direction: EntryDirection) -> Self {
        Self {
            should_enter: true,
            direction: Some(direction),
            reason: EntryReason::Ok,
        }
    }
}

/// Everything the entry gate looks at for one candle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntryInputs {
    pub market_regime_is_trending: bool,
    pub st_direction: StDirection,
    pub prev_st_direction: Option<StDirection>,
    pub supertrend_value: f64,
    pub candle_close: f64,
    pub macd_histogram: Option<f64>,
    pub entry_confidence: f64,
}

#[derive(Debug, Clone)]
pub struct EntryLogic {
    min_entry_confidence: f64,
}

impl Default for EntryLogic {
    fn default() -> Self {
        Self::new(MIN_ENTRY_CONFIDENCE)
    }
}

impl EntryLogic {
    pub fn new(min_entry_confidence: f64) -> Self {
        Self { min_entry_confidence }
    }

    pub fn min_entry_confidence(&self) -> f64 {
        self.min_entry_confidence
    }

    pub fn check_entry(&self, inputs: &EntryInputs) -> EntryDecision {
        let decision = self.evaluate(inputs);
        if decision.should_enter {
            tracing::debug!(
                "Entry gates passed: {:?} (confidence {:.0})",
                decision.direction,
                inputs.entry_confidence
            );
        } else {
            tracing::debug!("Entry blocked: {}", decision.reason);
        }
        decision
    }

    fn evaluate(&self, inputs: &EntryInputs) -> EntryDecision {
        if !inputs.market_regime_is_trending {
            return EntryDecision::blocked(EntryReason::SidewaysRegime);
        }

        let Some(prev) = inputs.prev_st_direction else {
            return EntryDecision::blocked(EntryReason::NoPrevSt);
        };

        if inputs.st_direction == prev {
            return EntryDecision::blocked(EntryReason::NoStFlip);
        }

        let Some(direction) = EntryDirection::from_flip(prev, inputs.st_direction) else {
            tracing::warn!(
                "Unexpected SuperTrend transition {} -> {}",
                prev,
                inputs.st_direction
            );
            return EntryDecision::blocked(EntryReason::InvalidStFlip);
        };

        match direction {
            EntryDirection::Bullish if !(inputs.candle_close > inputs.supertrend_value) => {
                return EntryDecision::blocked(EntryReason::PriceNotAboveSt);
            }
            EntryDirection::Bearish if !(inputs.candle_close < inputs.supertrend_value) => {
                return EntryDecision::blocked(EntryReason::PriceNotBelowSt);
            }
            _ => {}
        }

        match inputs.macd_histogram {
            Some(h) if h.abs() >= MACD_HIST_MIN => {}
            _ => return EntryDecision::blocked(EntryReason::MacdHistTooSmall),
        }

        if !(inputs.entry_confidence >= self.min_entry_confidence) {
            return EntryDecision::blocked(EntryReason::LowEntryConfidence);
        }

        EntryDecision::enter(direction)
    }
}
