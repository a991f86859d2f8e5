//! Property tests for scoring and cooldown invariants.
//!
//! Uses proptest to verify:
//! 1. Entry confidence bounds - total in [0, 100] and equal to the clamped factor sum
//! 2. Fixed factor values - no interpolated sub-scores
//! 3. Runtime clamping - any previous score and rule stack stays in [0, 100]
//! 4. Monotonic decay - without a continuation bonus, confidence never rises
//! 5. Cooldown countdown - exactly `duration` advances to re-enable entries

use proptest::prelude::*;
use supertrend_options_core::domain::{Candle, CooldownReason};
use supertrend_options_core::strategy::{
    ConfidenceCalculator, CooldownManager, RuntimeAdjustment, RuntimeInputs,
};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_candle() -> impl Strategy<Value = Candle> {
    (50.0..150.0_f64, 0.0..10.0_f64, 0.0..1.0_f64, 0.0..1.0_f64).prop_map(|(low, range, o, c)| {
        let high = low + range;
        Candle::new(low + o * range, high, low, low + c * range)
    })
}

fn arb_ranges() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.0..12.0_f64, 0..30)
}

fn arb_histogram() -> impl Strategy<Value = Option<f64>> {
    prop::option::of(-3.0..3.0_f64)
}

// ── 1 + 2. Entry confidence ──────────────────────────────────────────

proptest! {
    #[test]
    fn entry_total_is_clamped_sum(
        distance in 0.0..2.0_f64,
        candle in arb_candle(),
        macd in arb_histogram(),
        ranges in arb_ranges(),
    ) {
        let b = ConfidenceCalculator::new()
            .calculate_entry_confidence(distance, &candle, macd, &ranges);
        prop_assert!((0.0..=100.0).contains(&b.total));
        prop_assert_eq!(b.total, b.raw_sum().clamp(0.0, 100.0));
    }

    #[test]
    fn entry_sub_scores_take_fixed_values(
        distance in 0.0..2.0_f64,
        candle in arb_candle(),
        macd in arb_histogram(),
        ranges in arb_ranges(),
    ) {
        let b = ConfidenceCalculator::new()
            .calculate_entry_confidence(distance, &candle, macd, &ranges);
        prop_assert!(b.st_strength == 0.0 || b.st_strength == 30.0);
        prop_assert!(b.candle_body_strength == 0.0 || b.candle_body_strength == 20.0);
        prop_assert!([0.0, 15.0, 20.0, 25.0, 30.0].contains(&b.macd_momentum));
        prop_assert!(b.volatility_expansion == 0.0 || b.volatility_expansion == 20.0);
    }
}

// ── 3 + 4. Runtime confidence ────────────────────────────────────────

proptest! {
    #[test]
    fn runtime_always_clamped(
        previous in -50.0..150.0_f64,
        body in prop::option::of(0.0..100.0_f64),
        macd in arb_histogram(),
        prev_macd in arb_histogram(),
        held in 0u32..40,
        decay in 0u32..20,
    ) {
        let r = ConfidenceCalculator::new().calculate_runtime_confidence(&RuntimeInputs {
            previous_confidence: previous,
            candle_body_pct: body,
            macd_histogram: macd,
            prev_macd_histogram: prev_macd,
            candles_held: held,
            decay_after_candles: decay,
        });
        prop_assert!((0.0..=100.0).contains(&r.confidence));
    }

    #[test]
    fn runtime_never_rises_without_continuation(
        previous in 0.0..100.0_f64,
        body in prop::option::of(0.0..60.0_f64),
        macd in arb_histogram(),
        prev_macd in arb_histogram(),
        held in 0u32..40,
    ) {
        let r = ConfidenceCalculator::new().calculate_runtime_confidence(&RuntimeInputs {
            previous_confidence: previous,
            candle_body_pct: body,
            macd_histogram: macd,
            prev_macd_histogram: prev_macd,
            candles_held: held,
            decay_after_candles: 10,
        });
        prop_assert!(!r.adjustments.contains(&RuntimeAdjustment::Continuation));
        prop_assert!(r.confidence <= previous);
    }
}

// ── 5. Cooldown ──────────────────────────────────────────────────────

proptest! {
    #[test]
    fn cooldown_expires_after_exactly_duration(duration in 1u32..20) {
        let mut manager = CooldownManager::new(duration);
        manager.activate(CooldownReason::Exit, None);
        for step in 0..duration {
            prop_assert!(!manager.can_enter());
            prop_assert_eq!(manager.state().candles_remaining, duration - step);
            manager.advance();
        }
        prop_assert!(manager.can_enter());
        prop_assert!(!manager.state().active);
        prop_assert_eq!(manager.state().reason, None);
    }
}
