//! Decision Engine
//!
//! Per-candle glue tying the strategy components together for ONE instrument.
//! The caller owns market data, order placement and stop-loss management;
//! the engine only decides.
//!
//! Per candle:
//! - flat + cooldown active: count the cooldown down, no entry
//! - flat: regime -> entry confidence -> entry gates
//! - open: runtime confidence -> exit rules; any exit starts the cooldown

use chrono::NaiveTime;
use std::collections::VecDeque;

use crate::domain::{
    Candle, CooldownReason, EntryDirection, ExitReason, MarketRegime, PositionType, StDirection,
};
use crate::strategy::{
    ConfidenceBreakdown, ConfidenceCalculator, CooldownManager, CooldownState, EntryDecision,
    EntryInputs, EntryLogic, ExitInputs, ExitLogic, ExitSignal, MarketRegimeDetector,
    RegimeInfo, RuntimeConfidence, RuntimeInputs, StrategyConfig,
};

/// Candle ranges kept for the volatility expansion factor
const RANGE_WINDOW: usize = 14;

/// Option leg prices supplied by the position tracker
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PositionMarks {
    pub option_ltp: f64,
    pub hard_sl: Option<f64>,
    pub trailing_sl: Option<f64>,
}

/// Everything the engine needs for one closed candle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandleInput {
    pub candle: Candle,
    pub supertrend_value: f64,
    pub st_direction: StDirection,
    pub macd_histogram: Option<f64>,
    pub adx: Option<f64>,
    /// Exchange-local candle close time
    pub time: NaiveTime,
    pub marks: PositionMarks,
}

/// Position state tracked between candles
#[derive(Debug, Clone, PartialEq)]
pub struct OpenPosition {
    pub position_type: PositionType,
    pub direction: EntryDirection,
    pub entry_confidence: f64,
    pub runtime_confidence: f64,
    pub candles_held: u32,
}

/// What happened on a candle
#[derive(Debug, Clone, PartialEq)]
pub enum CandleOutcome {
    /// Flat, entries blocked; state as it was at the start of the candle
    CooldownActive(CooldownState),
    /// Flat, evaluated but did not enter
    Skipped {
        regime: MarketRegime,
        regime_info: RegimeInfo,
        confidence: ConfidenceBreakdown,
        decision: EntryDecision,
    },
    /// Position opened at this candle's close
    Entered {
        direction: EntryDirection,
        position_type: PositionType,
        confidence: ConfidenceBreakdown,
    },
    /// Position kept open
    Held { runtime: RuntimeConfidence },
    /// Position closed, cooldown started
    Exited {
        reason: ExitReason,
        runtime: RuntimeConfidence,
    },
}

impl CandleOutcome {
    pub fn exit_reason(&self) -> Option<ExitReason> {
        match self {
            CandleOutcome::Exited { reason, .. } => Some(*reason),
            _ => None,
        }
    }

    pub fn is_entry(&self) -> bool {
        matches!(self, CandleOutcome::Entered { .. })
    }
}

/// Single-instrument decision pipeline
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    config: StrategyConfig,
    regime: MarketRegimeDetector,
    confidence: ConfidenceCalculator,
    entry: EntryLogic,
    exit: ExitLogic,
    cooldown: CooldownManager,
    position: Option<OpenPosition>,
    prev_st_direction: Option<StDirection>,
    prev_macd_histogram: Option<f64>,
    recent_ranges: VecDeque<f64>,
}

impl Default for DecisionEngine {
    fn default() -> Self {
        Self::new(StrategyConfig::default())
    }
}

impl DecisionEngine {
    pub fn new(config: StrategyConfig) -> Self {
        Self {
            regime: MarketRegimeDetector::new(config.regime.clone()),
            confidence: ConfidenceCalculator::new(),
            entry: EntryLogic::new(config.confidence.min_entry_confidence),
            exit: ExitLogic::new(config.confidence.min_runtime_confidence, &config.exit),
            cooldown: CooldownManager::from_config(&config.cooldown),
            position: None,
            prev_st_direction: None,
            prev_macd_histogram: None,
            recent_ranges: VecDeque::with_capacity(RANGE_WINDOW),
            config,
        }
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    pub fn position(&self) -> Option<&OpenPosition> {
        self.position.as_ref()
    }

    pub fn cooldown_state(&self) -> CooldownState {
        self.cooldown.state()
    }

    /// Clear position, history and cooldown (new session)
    pub fn reset(&mut self) {
        self.position = None;
        self.prev_st_direction = None;
        self.prev_macd_histogram = None;
        self.recent_ranges.clear();
        self.cooldown.reset();
    }

    /// Process one closed candle
    pub fn on_candle(&mut self, input: &CandleInput) -> CandleOutcome {
        let outcome = match self.position.take() {
            Some(position) => self.manage_position(position, input),
            None if !self.cooldown.can_enter() => {
                let state = self.cooldown.state();
                self.cooldown.advance();
                CandleOutcome::CooldownActive(state)
            }
            None => self.evaluate_entry(input),
        };

        self.prev_st_direction = Some(input.st_direction);
        self.prev_macd_histogram = input.macd_histogram;
        if input.candle.is_valid() {
            if self.recent_ranges.len() == RANGE_WINDOW {
                self.recent_ranges.pop_front();
            }
            self.recent_ranges.push_back(input.candle.range());
        } else {
            tracing::warn!("Malformed candle {:?} kept out of the range window", input.candle);
        }

        outcome
    }

    fn evaluate_entry(&mut self, input: &CandleInput) -> CandleOutcome {
        let close = input.candle.close;
        let (regime, regime_info) = self.regime.detect(close, input.supertrend_value, input.adx);

        let ranges: Vec<f64> = self.recent_ranges.iter().copied().collect();
        let confidence = self.confidence.calculate_entry_confidence(
            regime_info.st_distance_pct.unwrap_or(0.0),
            &input.candle,
            input.macd_histogram,
            &ranges,
        );

        let decision = self.entry.check_entry(&EntryInputs {
            market_regime_is_trending: regime.is_trending(),
            st_direction: input.st_direction,
            prev_st_direction: self.prev_st_direction,
            supertrend_value: input.supertrend_value,
            candle_close: close,
            macd_histogram: input.macd_histogram,
            entry_confidence: confidence.total,
        });

        match decision.direction.filter(|_| decision.should_enter) {
            Some(direction) => {
                let position_type = PositionType::for_direction(direction);
                tracing::info!(
                    "ENTRY {} -> {} at {:.2} [{}]",
                    direction,
                    position_type,
                    close,
                    confidence
                );
                self.position = Some(OpenPosition {
                    position_type,
                    direction,
                    entry_confidence: confidence.total,
                    runtime_confidence: confidence.total,
                    candles_held: 0,
                });
                CandleOutcome::Entered {
                    direction,
                    position_type,
                    confidence,
                }
            }
            None => CandleOutcome::Skipped {
                regime,
                regime_info,
                confidence,
                decision,
            },
        }
    }

    fn manage_position(
        &mut self,
        mut position: OpenPosition,
        input: &CandleInput,
    ) -> CandleOutcome {
        position.candles_held += 1;

        let runtime = self.confidence.calculate_runtime_confidence(&RuntimeInputs {
            previous_confidence: position.runtime_confidence,
            candle_body_pct: input.candle.is_valid().then(|| input.candle.body_pct()),
            macd_histogram: input.macd_histogram,
            prev_macd_histogram: self.prev_macd_histogram,
            candles_held: position.candles_held,
            decay_after_candles: self.config.confidence.decay_after_candles,
        });
        position.runtime_confidence = runtime.confidence;

        let signal: ExitSignal = self.exit.check_exit(&ExitInputs {
            is_open_position: true,
            current_option_ltp: input.marks.option_ltp,
            hard_sl: input.marks.hard_sl,
            trailing_sl: input.marks.trailing_sl,
            runtime_confidence: runtime.confidence,
            st_direction: Some(input.st_direction),
            prev_st_direction: self.prev_st_direction,
            position_type: Some(position.position_type),
            current_time: input.time,
        });

        match signal.reason.filter(|_| signal.should_exit) {
            Some(reason) => {
                tracing::info!(
                    "EXIT {} {} after {} candles (confidence {:.0})",
                    position.position_type,
                    reason,
                    position.candles_held,
                    runtime.confidence
                );
                self.cooldown.activate(CooldownReason::Exit, None);
                CandleOutcome::Exited { reason, runtime }
            }
            None => {
                self.position = Some(position);
                CandleOutcome::Held { runtime }
            }
        }
    }
}
