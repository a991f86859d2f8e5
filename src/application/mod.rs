//! Application Layer
//!
//! Per-candle decision pipeline and process-level logging setup.

pub mod engine;
pub mod logging;

pub use engine::{CandleInput, CandleOutcome, DecisionEngine, OpenPosition, PositionMarks};
pub use logging::init_logging;
