//! Exit Logic
//!
//! Risk-first exits. Conditions are checked in strict priority order and the
//! first match wins; they are never combined:
//!
//! 1. Hard stop loss        -> SL_HIT
//! 2. Trailing stop loss    -> TSL_HIT
//! 3. Runtime confidence    -> CONFIDENCE_DROP
//! 4. Opposing ST flip      -> ST_REVERSAL
//! 5. End-of-day cutoff     -> EOD_EXIT

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::domain::{ExitReason, PositionType, StDirection, ST_DOWN, ST_UP};
use crate::strategy::params::{ExitConfig, MIN_RUNTIME_CONFIDENCE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitSignal {
    pub should_exit: bool,
    pub reason: Option<ExitReason>,
}

impl ExitSignal {
    pub fn hold() -> Self {
        Self {
            should_exit: false,
            reason: None,
        }
    }

    pub fn exit(reason: ExitReason) -> Self {
        Self {
            should_exit: true,
            reason: Some(reason),
        }
    }
}

/// Position and market state for one exit evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitInputs {
    pub is_open_position: bool,
    pub current_option_ltp: f64,
    pub hard_sl: Option<f64>,
    pub trailing_sl: Option<f64>,
    pub runtime_confidence: f64,
    pub st_direction: Option<StDirection>,
    pub prev_st_direction: Option<StDirection>,
    /// `None` when the broker reported a leg type we do not trade
    pub position_type: Option<PositionType>,
    /// Wall-clock time in the exchange's local zone
    pub current_time: NaiveTime,
}

#[derive(Debug, Clone)]
pub struct ExitLogic {
    min_runtime_confidence: f64,
    eod_cutoff: NaiveTime,
    bypass_eod_exit: bool,
}

impl Default for ExitLogic {
    fn default() -> Self {
        Self::new(MIN_RUNTIME_CONFIDENCE, &ExitConfig::default())
    }
}

impl ExitLogic {
    pub fn new(min_runtime_confidence: f64, config: &ExitConfig) -> Self {
        Self {
            min_runtime_confidence,
            eod_cutoff: config.eod_cutoff,
            bypass_eod_exit: config.bypass_eod_exit,
        }
    }

    pub fn eod_cutoff(&self) -> NaiveTime {
        self.eod_cutoff
    }

    pub fn check_exit(&self, inputs: &ExitInputs) -> ExitSignal {
        let signal = self.evaluate(inputs);
        if let Some(reason) = signal.reason {
            tracing::debug!(
                "Exit condition {} (ltp={:.2}, conf={:.0})",
                reason,
                inputs.current_option_ltp,
                inputs.runtime_confidence
            );
        }
        signal
    }

    fn evaluate(&self, inputs: &ExitInputs) -> ExitSignal {
        if !inputs.is_open_position {
            return ExitSignal::hold();
        }

        let ltp = inputs.current_option_ltp;
        let stop_hit = |level: Option<f64>| matches!(level, Some(sl) if ltp > 0.0 && ltp <= sl);

        if stop_hit(inputs.hard_sl) {
            return ExitSignal::exit(ExitReason::SlHit);
        }

        if stop_hit(inputs.trailing_sl) {
            return ExitSignal::exit(ExitReason::TslHit);
        }

        if inputs.runtime_confidence <= self.min_runtime_confidence {
            return ExitSignal::exit(ExitReason::ConfidenceDrop);
        }

        if Self::is_opposing_reversal(inputs) {
            return ExitSignal::exit(ExitReason::StReversal);
        }

        if !self.bypass_eod_exit && inputs.current_time >= self.eod_cutoff {
            return ExitSignal::exit(ExitReason::EodExit);
        }

        ExitSignal::hold()
    }

    /// A flip counts only when it runs against the held leg
    fn is_opposing_reversal(inputs: &ExitInputs) -> bool {
        let (Some(prev), Some(current)) = (inputs.prev_st_direction, inputs.st_direction) else {
            return false;
        };
        match inputs.position_type {
            Some(PositionType::Ce) => prev == ST_UP && current == ST_DOWN,
            Some(PositionType::Pe) => prev == ST_DOWN && current == ST_UP,
            None => false,
        }
    }
}
