//! Decision Pipeline Integration Tests
//!
//! Drives the full candle loop through the public API:
//! 1. Regime gate -> confidence -> entry gates
//! 2. Runtime confidence decay -> exit priority
//! 3. Exit -> cooldown -> re-entry
//!
//! All tests are deterministic and use synthetic candles.

use chrono::NaiveTime;
use supertrend_options_core::application::{
    CandleInput, CandleOutcome, DecisionEngine, PositionMarks,
};
use supertrend_options_core::config::parse_config;
use supertrend_options_core::domain::{Candle, ExitReason, PositionType};
use supertrend_options_core::strategy::{EntryReason, RuntimeAdjustment, StrategyConfig};

// ============================================================================
// Test Fixtures
// ============================================================================

fn at(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

/// Quiet candle in an established SuperTrend direction
fn trend_candle(st_direction: i8) -> CandleInput {
    let supertrend_value = if st_direction > 0 { 98.0 } else { 102.0 };
    CandleInput {
        candle: Candle::new(100.0, 100.5, 99.5, 100.1),
        supertrend_value,
        st_direction,
        macd_histogram: Some(0.3 * st_direction as f64),
        adx: None,
        time: at(10, 0),
        marks: PositionMarks::default(),
    }
}

/// Wide-range bearish flip candle closing well below SuperTrend
fn bearish_flip() -> CandleInput {
    CandleInput {
        candle: Candle::new(100.0, 100.2, 95.2, 95.5),
        supertrend_value: 97.0,
        st_direction: -1,
        macd_histogram: Some(-1.6),
        adx: None,
        time: at(11, 0),
        marks: PositionMarks::default(),
    }
}

fn holding(input: CandleInput, ltp: f64) -> CandleInput {
    CandleInput {
        marks: PositionMarks {
            option_ltp: ltp,
            hard_sl: Some(80.0),
            trailing_sl: Some(90.0),
        },
        ..input
    }
}

fn engine_in_uptrend() -> DecisionEngine {
    let mut engine = DecisionEngine::default();
    for _ in 0..4 {
        engine.on_candle(&trend_candle(1));
    }
    engine
}

// ============================================================================
// Entry Flow
// ============================================================================

#[test]
fn test_bearish_flip_opens_put() {
    let mut engine = engine_in_uptrend();
    match engine.on_candle(&bearish_flip()) {
        CandleOutcome::Entered { position_type, confidence, .. } => {
            assert_eq!(position_type, PositionType::Pe);
            assert_eq!(confidence.total, 100.0);
        }
        other => panic!("expected entry, got {:?}", other),
    }
}

#[test]
fn test_sideways_blocks_entry() {
    let mut engine = engine_in_uptrend();
    // SuperTrend hugging price: 0.1% distance
    let flip = CandleInput { supertrend_value: 95.6, ..bearish_flip() };
    match engine.on_candle(&flip) {
        CandleOutcome::Skipped { decision, .. } => {
            assert_eq!(decision.reason, EntryReason::SidewaysRegime)
        }
        other => panic!("expected skip, got {:?}", other),
    }
}

#[test]
fn test_weak_confidence_blocks_entry() {
    let mut engine = engine_in_uptrend();
    // Small body, small range, weak MACD: passes the gate but scores low
    let flip = CandleInput {
        candle: Candle::new(96.0, 96.3, 95.3, 95.8),
        macd_histogram: Some(-0.55),
        ..bearish_flip()
    };
    match engine.on_candle(&flip) {
        CandleOutcome::Skipped { decision, confidence, .. } => {
            assert_eq!(decision.reason, EntryReason::LowEntryConfidence);
            assert!(confidence.total < 65.0);
        }
        other => panic!("expected skip, got {:?}", other),
    }
}

#[test]
fn test_adx_mode_from_config() {
    let config = parse_config("[regime]\nuse_adx = true\nadx_threshold = 25.0\n").unwrap();
    let strategy = StrategyConfig::try_from(&config).unwrap();
    let mut engine = DecisionEngine::new(strategy);
    for _ in 0..4 {
        engine.on_candle(&trend_candle(1));
    }
    let flip = CandleInput { adx: Some(18.0), ..bearish_flip() };
    match engine.on_candle(&flip) {
        CandleOutcome::Skipped { decision, .. } => {
            assert_eq!(decision.reason, EntryReason::SidewaysRegime)
        }
        other => panic!("expected skip, got {:?}", other),
    }
}

#[test]
fn test_malformed_candle_stays_out_of_range_window() {
    let mut engine = DecisionEngine::default();
    for _ in 0..3 {
        engine.on_candle(&trend_candle(1));
    }
    let broken = CandleInput {
        candle: Candle::new(100.0, f64::NAN, 99.5, 100.1),
        ..trend_candle(1)
    };
    engine.on_candle(&broken);
    for _ in 0..3 {
        engine.on_candle(&trend_candle(1));
    }

    match engine.on_candle(&bearish_flip()) {
        CandleOutcome::Entered { confidence, .. } => {
            assert_eq!(confidence.volatility_expansion, 20.0);
            assert_eq!(confidence.total, 100.0);
        }
        other => panic!("expected entry, got {:?}", other),
    }
}

// ============================================================================
// Position Management
// ============================================================================

#[test]
fn test_trailing_stop_exit() {
    let mut engine = engine_in_uptrend();
    assert!(engine.on_candle(&bearish_flip()).is_entry());

    let outcome = engine.on_candle(&holding(trend_candle(-1), 88.0));
    assert_eq!(outcome.exit_reason(), Some(ExitReason::TslHit));
}

#[test]
fn test_confidence_decays_to_exit() {
    let mut engine = engine_in_uptrend();
    assert!(engine.on_candle(&bearish_flip()).is_entry());

    // Doji candles with shrinking MACD: -20 per candle from 100
    let mut reasons = Vec::new();
    for i in 0..3 {
        let candle = CandleInput {
            candle: Candle::new(95.5, 96.0, 95.0, 95.55),
            macd_histogram: Some(-1.0 + 0.2 * i as f64),
            ..holding(trend_candle(-1), 120.0)
        };
        reasons.push(engine.on_candle(&candle));
    }

    match &reasons[0] {
        CandleOutcome::Held { runtime } => {
            assert_eq!(runtime.confidence, 80.0);
            assert_eq!(
                runtime.adjustments,
                vec![RuntimeAdjustment::WeakBody, RuntimeAdjustment::MacdShrink]
            );
        }
        other => panic!("expected hold, got {:?}", other),
    }
    assert!(matches!(reasons[1], CandleOutcome::Held { .. }));
    assert_eq!(reasons[2].exit_reason(), Some(ExitReason::ConfidenceDrop));
}

#[test]
fn test_opposing_flip_exits_put() {
    let mut engine = engine_in_uptrend();
    assert!(engine.on_candle(&bearish_flip()).is_entry());
    engine.on_candle(&holding(
        CandleInput {
            candle: Candle::new(95.5, 95.6, 94.0, 94.1),
            macd_histogram: Some(-2.0),
            ..trend_candle(-1)
        },
        130.0,
    ));

    let reversal = holding(
        CandleInput {
            candle: Candle::new(94.0, 99.0, 94.0, 98.5),
            macd_histogram: Some(-2.5),
            ..trend_candle(1)
        },
        110.0,
    );
    assert_eq!(engine.on_candle(&reversal).exit_reason(), Some(ExitReason::StReversal));
}

#[test]
fn test_end_of_day_exit_and_bypass() {
    let mut engine = engine_in_uptrend();
    assert!(engine.on_candle(&bearish_flip()).is_entry());
    let late = CandleInput {
        candle: Candle::new(95.5, 95.6, 94.0, 94.1),
        macd_histogram: Some(-2.0),
        time: at(15, 20),
        ..holding(trend_candle(-1), 130.0)
    };
    assert_eq!(engine.on_candle(&late).exit_reason(), Some(ExitReason::EodExit));

    let mut engine = DecisionEngine::new(StrategyConfig::default().with_eod_bypass(true));
    for _ in 0..4 {
        engine.on_candle(&trend_candle(1));
    }
    assert!(engine.on_candle(&bearish_flip()).is_entry());
    assert!(matches!(engine.on_candle(&late), CandleOutcome::Held { .. }));
}

// ============================================================================
// Cooldown
// ============================================================================

#[test]
fn test_cooldown_blocks_reentry_for_configured_candles() {
    let mut engine = DecisionEngine::new(StrategyConfig::default().with_cooldown(2));
    for _ in 0..4 {
        engine.on_candle(&trend_candle(1));
    }
    assert!(engine.on_candle(&bearish_flip()).is_entry());
    assert_eq!(
        engine.on_candle(&holding(trend_candle(-1), 70.0)).exit_reason(),
        Some(ExitReason::SlHit)
    );

    // A perfect setup during cooldown is ignored
    engine.on_candle(&trend_candle(1));
    assert!(matches!(engine.on_candle(&bearish_flip()), CandleOutcome::CooldownActive(_)));
    assert!(!engine.cooldown_state().active);

    engine.on_candle(&trend_candle(1));
    assert!(engine.on_candle(&bearish_flip()).is_entry());
}
