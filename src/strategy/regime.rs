//! Market Regime Detection
//!
//! Gatekeeper for entries: no new positions in sideways / low-strength markets.
//!
//! Two mutually exclusive methods, selected at construction:
//! - **ADX**: trending when ADX >= threshold (used only when enabled AND a reading exists)
//! - **ST distance**: trending when |price - supertrend| / price >= threshold %
//!
//! Missing data always resolves to `Sideways`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::MarketRegime;
use crate::strategy::params::RegimeConfig;

/// Classification method that produced a regime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegimeMethod {
    #[serde(rename = "ADX")]
    Adx,
    #[serde(rename = "ST_DISTANCE")]
    StDistance,
}

impl RegimeMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegimeMethod::Adx => "ADX",
            RegimeMethod::StDistance => "ST_DISTANCE",
        }
    }
}

/// Diagnostics for one regime classification
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimeInfo {
    pub method: RegimeMethod,
    pub adx: Option<f64>,
    pub adx_threshold: f64,
    /// Always reported, even when ADX decided
    pub st_distance_pct: Option<f64>,
    pub st_distance_threshold_pct: f64,
}

impl RegimeInfo {
    /// Diagnostic map for structured log sinks
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "method": self.method.as_str(),
            "adx": self.adx,
            "adx_threshold": self.adx_threshold,
            "st_distance_pct": self.st_distance_pct,
            "st_distance_threshold_pct": self.st_distance_threshold_pct,
        })
    }
}

impl fmt::Display for RegimeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "method={}", self.method.as_str())?;
        match self.adx {
            Some(adx) => write!(f, " adx={:.2}/{:.2}", adx, self.adx_threshold)?,
            None => write!(f, " adx=n/a")?,
        }
        match self.st_distance_pct {
            Some(d) => write!(f, " st_dist={:.3}%/{:.3}%", d, self.st_distance_threshold_pct),
            None => write!(f, " st_dist=n/a"),
        }
    }
}

/// Stateless regime classifier
#[derive(Debug, Clone)]
pub struct MarketRegimeDetector {
    config: RegimeConfig,
}

impl Default for MarketRegimeDetector {
    fn default() -> Self {
        Self::new(RegimeConfig::default())
    }
}

impl MarketRegimeDetector {
    pub fn new(config: RegimeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RegimeConfig {
        &self.config
    }

    /// Percentage distance between price and the SuperTrend line.
    ///
    /// `None` when price is not positive (or not a number), since the ratio is undefined.
    pub fn st_distance_pct(current_price: f64, supertrend_value: f64) -> Option<f64> {
        if !(current_price > 0.0) || !supertrend_value.is_finite() {
            return None;
        }
        Some((current_price - supertrend_value).abs() / current_price * 100.0)
    }

    /// Classify the market for the current candle
    pub fn detect(
        &self,
        current_price: f64,
        supertrend_value: f64,
        adx: Option<f64>,
    ) -> (MarketRegime, RegimeInfo) {
        let st_distance_pct = Self::st_distance_pct(current_price, supertrend_value);

        let (method, regime) = match adx {
            Some(adx) if self.config.use_adx => {
                let regime = if adx >= self.config.adx_threshold {
                    MarketRegime::Trending
                } else {
                    MarketRegime::Sideways
                };
                (RegimeMethod::Adx, regime)
            }
            _ => {
                let regime = match st_distance_pct {
                    Some(d) if d >= self.config.st_distance_sideways_threshold_pct => {
                        MarketRegime::Trending
                    }
                    _ => MarketRegime::Sideways,
                };
                (RegimeMethod::StDistance, regime)
            }
        };

        let info = RegimeInfo {
            method,
            adx,
            adx_threshold: self.config.adx_threshold,
            st_distance_pct,
            st_distance_threshold_pct: self.config.st_distance_sideways_threshold_pct,
        };

        tracing::debug!("Regime {} ({})", regime, info);
        (regime, info)
    }
}
