//! Closed vocabulary shared by the decision components.

use serde::{Deserialize, Serialize};
use std::fmt;

/// SuperTrend direction as produced by the indicator engine (+1 up, -1 down)
pub type StDirection = i8;

pub const ST_UP: StDirection = 1;
pub const ST_DOWN: StDirection = -1;

/// Market regime classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketRegime {
    Sideways,
    Trending,
}

impl MarketRegime {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketRegime::Sideways => "SIDEWAYS",
            MarketRegime::Trending => "TRENDING",
        }
    }

    pub fn is_trending(&self) -> bool {
        matches!(self, MarketRegime::Trending)
    }
}

/// Direction of a confirmed SuperTrend flip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryDirection {
    Bullish,
    Bearish,
}

impl EntryDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryDirection::Bullish => "BULLISH",
            EntryDirection::Bearish => "BEARISH",
        }
    }

    /// Classify a flip between two SuperTrend readings.
    ///
    /// Only -1 -> 1 and 1 -> -1 are valid transitions.
    pub fn from_flip(prev: StDirection, current: StDirection) -> Option<Self> {
        match (prev, current) {
            (ST_DOWN, ST_UP) => Some(EntryDirection::Bullish),
            (ST_UP, ST_DOWN) => Some(EntryDirection::Bearish),
            _ => None,
        }
    }
}

/// Why a position was closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExitReason {
    #[serde(rename = "SL_HIT")]
    SlHit,
    #[serde(rename = "TSL_HIT")]
    TslHit,
    #[serde(rename = "CONFIDENCE_DROP")]
    ConfidenceDrop,
    #[serde(rename = "ST_REVERSAL")]
    StReversal,
    #[serde(rename = "EOD_EXIT")]
    EodExit,
}

impl ExitReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExitReason::SlHit => "SL_HIT",
            ExitReason::TslHit => "TSL_HIT",
            ExitReason::ConfidenceDrop => "CONFIDENCE_DROP",
            ExitReason::StReversal => "ST_REVERSAL",
            ExitReason::EodExit => "EOD_EXIT",
        }
    }
}

/// Why entries are currently blocked by the cooldown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CooldownReason {
    Exit,
}

impl CooldownReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            CooldownReason::Exit => "EXIT",
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

display_as_str!(MarketRegime, EntryDirection, ExitReason, CooldownReason);
