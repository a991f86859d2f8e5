//! Domain Layer - value types shared by the decision components
//!
//! Pure data with no I/O. Indicator values (SuperTrend, MACD, ADX) arrive
//! pre-computed from the indicator engine; this layer only names them.

pub mod candle;
pub mod position;
pub mod signal;

pub use candle::Candle;
pub use position::{PositionError, PositionType};
pub use signal::{
    CooldownReason, EntryDirection, ExitReason, MarketRegime, StDirection, ST_DOWN, ST_UP,
};
