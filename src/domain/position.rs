use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::signal::EntryDirection;

/// Option leg held by the bot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositionType {
    /// Call option, profits from a bullish move
    #[serde(rename = "CE")]
    Ce,
    /// Put option, profits from a bearish move
    #[serde(rename = "PE")]
    Pe,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PositionError {
    #[error("Unknown position type: {0:?} (expected CE or PE)")]
    UnknownType(String),
}

impl PositionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PositionType::Ce => "CE",
            PositionType::Pe => "PE",
        }
    }

    /// Leg opened for a given entry direction
    pub fn for_direction(direction: EntryDirection) -> Self {
        match direction {
            EntryDirection::Bullish => PositionType::Ce,
            EntryDirection::Bearish => PositionType::Pe,
        }
    }
}

impl fmt::Display for PositionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PositionType {
    type Err = PositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CE" => Ok(PositionType::Ce),
            "PE" => Ok(PositionType::Pe),
            _ => Err(PositionError::UnknownType(s.to_string())),
        }
    }
}
