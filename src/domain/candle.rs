use serde::{Deserialize, Serialize};

/// OHLC candle as delivered by the indicator engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Candle {
    pub fn new(open: f64, high: f64, low: f64, close: f64) -> Self {
        Self { open, high, low, close }
    }

    /// High-low range of the candle
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Body size as a percentage of the candle range.
    ///
    /// Returns 0 for a flat candle (high == low) so doji bars never count as strong.
    pub fn body_pct(&self) -> f64 {
        let range = self.range();
        if range > 0.0 {
            (self.close - self.open).abs() / range * 100.0
        } else {
            0.0
        }
    }

    /// Validate OHLC data integrity
    pub fn is_valid(&self) -> bool {
        self.high.is_finite()
            && self.low.is_finite()
            && self.open.is_finite()
            && self.close.is_finite()
            && self.high >= self.low
            && self.open >= self.low
            && self.open <= self.high
            && self.close >= self.low
            && self.close <= self.high
    }
}
