//! Strategy Layer - SuperTrend flip entries with confidence-managed exits
//!
//! Components, each pure except the cooldown counter:
//! - `regime`: trending / sideways gate (ADX or price-to-SuperTrend distance)
//! - `confidence`: entry score (0-100) and per-candle runtime re-score
//! - `entry`: seven ordered entry gates
//! - `exit`: prioritised exit conditions
//! - `cooldown`: candle-count pause after every exit

pub mod params;
pub mod regime;
pub mod confidence;
pub mod entry;
pub mod exit;
pub mod cooldown;

pub use params::{
    ConfidenceConfig, CooldownConfig, ExitConfig, ParamsError, RegimeConfig, StrategyConfig,
    MIN_ENTRY_CONFIDENCE, MIN_RUNTIME_CONFIDENCE,
};
pub use regime::{MarketRegimeDetector, RegimeInfo, RegimeMethod};
pub use confidence::{
    ConfidenceBreakdown, ConfidenceCalculator, RuntimeAdjustment, RuntimeConfidence, RuntimeInputs,
};
pub use entry::{EntryDecision, EntryInputs, EntryLogic, EntryReason, MACD_HIST_MIN};
pub use exit::{ExitInputs, ExitLogic, ExitSignal};
pub use cooldown::{CooldownManager, CooldownState};
