//! Confidence Scoring
//!
//! Entry confidence is computed once per candidate entry (0-100), from four
//! all-or-nothing factors:
//!
//! | Factor                | Points | Condition                                   |
//! |-----------------------|--------|---------------------------------------------|
//! | SuperTrend strength   | 30     | price-to-ST distance > 0.25%                |
//! | Candle body strength  | 20     | body >= 60% of range                        |
//! | MACD momentum         | 0-30   | tiered on abs(histogram)                    |
//! | Volatility expansion  | 20     | range > mean of last <=14 ranges (>=3 given)|
//!
//! Runtime confidence starts from the entry score and is re-scored every
//! candle while a position is open.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::Candle;
use crate::strategy::params::{MIN_ENTRY_CONFIDENCE, MIN_RUNTIME_CONFIDENCE};

const ST_STRONG_THRESHOLD_PCT: f64 = 0.25;
const BODY_STRONG_THRESHOLD_PCT: f64 = 60.0;
const BODY_WEAK_THRESHOLD_PCT: f64 = 30.0;
const VOL_EXPANSION_WINDOW: usize = 14;
const VOL_EXPANSION_MIN_SAMPLES: usize = 3;

const ST_STRENGTH_POINTS: f64 = 30.0;
const BODY_STRENGTH_POINTS: f64 = 20.0;
const VOL_EXPANSION_POINTS: f64 = 20.0;

/// (min abs histogram, points), strongest tier first
const MACD_TIERS: [(f64, f64); 4] = [(1.5, 30.0), (1.0, 25.0), (0.75, 20.0), (0.5, 15.0)];

/// Entry confidence with its per-factor contributions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBreakdown {
    /// Sum of sub-scores clamped to [0, 100]
    pub total: f64,
    pub st_strength: f64,
    pub candle_body_strength: f64,
    pub macd_momentum: f64,
    pub volatility_expansion: f64,
    pub notes: String,
}

impl ConfidenceBreakdown {
    /// Unclamped sum of the four factors
    pub fn raw_sum(&self) -> f64 {
        self.st_strength
            + self.candle_body_strength
            + self.macd_momentum
            + self.volatility_expansion
    }
}

impl fmt::Display for ConfidenceBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total={:.0} | ST={:.0} | Body={:.0} | MACD={:.0} | Vol={:.0}",
            self.total,
            self.st_strength,
            self.candle_body_strength,
            self.macd_momentum,
            self.volatility_expansion
        )?;
        if !self.notes.is_empty() {
            write!(f, " | {}", self.notes)?;
        }
        Ok(())
    }
}

/// A single runtime confidence adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuntimeAdjustment {
    /// Body < 30% of range: -10
    WeakBody,
    /// abs(MACD histogram) smaller than last candle: -10
    MacdShrink,
    /// Held longer than the decay window: -5
    TimeDecay,
    /// Body >= 60% of range: +5
    Continuation,
}

impl RuntimeAdjustment {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuntimeAdjustment::WeakBody => "WEAK_BODY",
            RuntimeAdjustment::MacdShrink => "MACD_SHRINK",
            RuntimeAdjustment::TimeDecay => "TIME_DECAY",
            RuntimeAdjustment::Continuation => "CONTINUATION",
        }
    }

    pub fn delta(&self) -> f64 {
        match self {
            RuntimeAdjustment::WeakBody => -10.0,
            RuntimeAdjustment::MacdShrink => -10.0,
            RuntimeAdjustment::TimeDecay => -5.0,
            RuntimeAdjustment::Continuation => 5.0,
        }
    }
}

/// Result of one runtime re-score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfidence {
    /// Clamped to [0, 100]
    pub confidence: f64,
    /// Applied adjustments in evaluation order
    pub adjustments: Vec<RuntimeAdjustment>,
}

impl RuntimeConfidence {
    /// Adjustment tags joined with "+", or "NO_CHANGE"
    pub fn reason(&self) -> String {
        if self.adjustments.is_empty() {
            return "NO_CHANGE".to_string();
        }
        self.adjustments
            .iter()
            .map(RuntimeAdjustment::as_str)
            .collect::<Vec<_>>()
            .join("+")
    }
}

/// Inputs for a runtime re-score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuntimeInputs {
    pub previous_confidence: f64,
    pub candle_body_pct: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub prev_macd_histogram: Option<f64>,
    pub candles_held: u32,
    pub decay_after_candles: u32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConfidenceCalculator;

impl ConfidenceCalculator {
    pub const MIN_ENTRY_CONFIDENCE: f64 = MIN_ENTRY_CONFIDENCE;
    pub const MIN_RUNTIME_CONFIDENCE: f64 = MIN_RUNTIME_CONFIDENCE;

    pub fn new() -> Self {
        Self
    }

    /// Body as % of range for raw OHLC values
    pub fn body_pct(open: f64, high: f64, low: f64, close: f64) -> f64 {
        Candle::new(open, high, low, close).body_pct()
    }

    /// Tiered MACD momentum score. No partial credit between tiers.
    ///
    /// The mandatory >= 0.5 gate lives in entry logic; this may be 0 on its own.
    pub fn macd_momentum_score(macd_histogram: Option<f64>) -> f64 {
        let Some(h) = macd_histogram.map(f64::abs) else {
            return 0.0;
        };
        MACD_TIERS
            .iter()
            .find(|(min, _)| h >= *min)
            .map(|(_, points)| *points)
            .unwrap_or(0.0)
    }

    /// Score a candidate entry.
    ///
    /// `recent_ranges` are prior candle ranges ordered oldest to newest.
    pub fn calculate_entry_confidence(
        &self,
        supertrend_distance_pct: f64,
        candle: &Candle,
        macd_histogram: Option<f64>,
        recent_ranges: &[f64],
    ) -> ConfidenceBreakdown {
        let st_strength = if supertrend_distance_pct > ST_STRONG_THRESHOLD_PCT {
            ST_STRENGTH_POINTS
        } else {
            0.0
        };

        let body_pct = candle.body_pct();
        let candle_body_strength = if body_pct >= BODY_STRONG_THRESHOLD_PCT {
            BODY_STRENGTH_POINTS
        } else {
            0.0
        };

        let macd_momentum = Self::macd_momentum_score(macd_histogram);

        let volatility_expansion = if Self::is_volatility_expanding(candle.range(), recent_ranges) {
            VOL_EXPANSION_POINTS
        } else {
            0.0
        };

        let raw = st_strength + candle_body_strength + macd_momentum + volatility_expansion;
        let breakdown = ConfidenceBreakdown {
            total: raw.clamp(0.0, 100.0),
            st_strength,
            candle_body_strength,
            macd_momentum,
            volatility_expansion,
            notes: format!("BodyPct={:.0} STDist={:.3}%", body_pct, supertrend_distance_pct),
        };

        tracing::debug!("Entry confidence: {}", breakdown);
        breakdown
    }

    fn is_volatility_expanding(candle_range: f64, recent_ranges: &[f64]) -> bool {
        if candle_range <= 0.0 || recent_ranges.len() < VOL_EXPANSION_MIN_SAMPLES {
            return false;
        }
        let window = &recent_ranges[recent_ranges.len().saturating_sub(VOL_EXPANSION_WINDOW)..];
        let avg_range = window.iter().sum::<f64>() / window.len() as f64;
        avg_range > 0.0 && candle_range > avg_range
    }

    /// Re-score confidence for an open position.
    ///
    /// Adjustments stack in fixed order: WEAK_BODY, MACD_SHRINK, TIME_DECAY, CONTINUATION.
    pub fn calculate_runtime_confidence(&self, inputs: &RuntimeInputs) -> RuntimeConfidence {
        let mut adjustments = Vec::with_capacity(4);

        if matches!(inputs.candle_body_pct, Some(b) if b < BODY_WEAK_THRESHOLD_PCT) {
            adjustments.push(RuntimeAdjustment::WeakBody);
        }

        if let (Some(h), Some(prev)) = (inputs.macd_histogram, inputs.prev_macd_histogram) {
            if h.abs() < prev.abs() {
                adjustments.push(RuntimeAdjustment::MacdShrink);
            }
        }

        if inputs.candles_held > inputs.decay_after_candles {
            adjustments.push(RuntimeAdjustment::TimeDecay);
        }

        if matches!(inputs.candle_body_pct, Some(b) if b >= BODY_STRONG_THRESHOLD_PCT) {
            adjustments.push(RuntimeAdjustment::Continuation);
        }

        let confidence = adjustments
            .iter()
            .fold(inputs.previous_confidence, |conf, adj| conf + adj.delta())
            .clamp(0.0, 100.0);

        let result = RuntimeConfidence { confidence, adjustments };
        tracing::debug!(
            "Runtime confidence {:.0} -> {:.0} ({})",
            inputs.previous_confidence,
            result.confidence,
            result.reason()
        );
        result
    }
}
