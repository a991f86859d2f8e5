//! Cooldown Manager
//!
//! Mandatory pause after ANY exit: entries stay blocked for a fixed number of
//! candles (default 3).
//!
//! INACTIVE --activate--> ACTIVE(n) --advance--> ACTIVE(n-1) ... ACTIVE(1) --advance--> INACTIVE
//! `reset` returns to INACTIVE from any state.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::CooldownReason;
use crate::strategy::params::CooldownConfig;

/// Snapshot of the cooldown for logging / display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CooldownState {
    pub active: bool,
    pub candles_remaining: u32,
    pub reason: Option<CooldownReason>,
}

impl CooldownState {
    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl fmt::Display for CooldownState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.active, self.reason) {
            (true, Some(reason)) => {
                write!(f, "ACTIVE({}) after {}", self.candles_remaining, reason)
            }
            (true, None) => write!(f, "ACTIVE({})", self.candles_remaining),
            (false, _) => f.write_str("INACTIVE"),
        }
    }
}

/// Per-instrument post-exit cooldown. Single writer; not shared across contexts.
#[derive(Debug, Clone)]
pub struct CooldownManager {
    cooldown_duration: u32,
    remaining: u32,
    reason: Option<CooldownReason>,
}

impl Default for CooldownManager {
    fn default() -> Self {
        Self::new(CooldownConfig::default().cooldown_candles)
    }
}

impl CooldownManager {
    pub fn new(cooldown_candles: u32) -> Self {
        Self {
            cooldown_duration: cooldown_candles,
            remaining: 0,
            reason: None,
        }
    }

    pub fn from_config(config: &CooldownConfig) -> Self {
        Self::new(config.cooldown_candles)
    }

    pub fn duration(&self) -> u32 {
        self.cooldown_duration
    }

    /// Force back to INACTIVE
    pub fn reset(&mut self) {
        self.remaining = 0;
        self.reason = None;
    }

    /// Start (or restart) the cooldown. `None` uses the configured duration.
    pub fn activate(&mut self, reason: CooldownReason, duration: Option<u32>) {
        self.remaining = duration.unwrap_or(self.cooldown_duration);
        // Zero-length cooldown is INACTIVE, so no reason is carried
        self.reason = if self.remaining > 0 { Some(reason) } else { None };
        tracing::info!("Cooldown activated: {} candles ({})", self.remaining, reason);
    }

    /// Count down one candle
    pub fn advance(&mut self) {
        if self.remaining == 0 {
            return;
        }
        self.remaining -= 1;
        if self.remaining == 0 {
            self.reason = None;
            tracing::info!("Cooldown expired - entries allowed");
        } else {
            tracing::debug!("Cooldown: {} candles remaining", self.remaining);
        }
    }

    pub fn can_enter(&self) -> bool {
        self.remaining == 0
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0
    }

    pub fn state(&self) -> CooldownState {
        CooldownState {
            active: self.remaining > 0,
            candles_remaining: self.remaining,
            reason: self.reason,
        }
    }
}
