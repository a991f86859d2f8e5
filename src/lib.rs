//! SuperTrend Options Core - decision engine for an options trading bot
//!
//! Classifies per-candle market state and emits entry/exit decisions from
//! pre-computed indicators (SuperTrend, MACD histogram, ADX).
//!
//! # Modules
//!
//! - `domain`: Value types (Candle, PositionType, regime/direction/exit vocabulary)
//! - `strategy`: Regime gate, confidence scoring, entry/exit rules, cooldown
//! - `config`: Configuration loading and validation
//! - `application`: Per-candle decision pipeline and logging setup

pub mod domain;
pub mod strategy;
pub mod config;
pub mod application;
