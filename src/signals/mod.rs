//! Signal Layer
//!
//! Turns indicator columns into per-row decisions with a strength score.

pub mod core;
pub mod macd;
pub mod rsi;

pub use self::core::{Signal, SignalRecord};
pub use macd::{MACD_SIGNAL_COLUMN, MACD_STRENGTH_COLUMN, macd_crossovers};
pub use rsi::{RSI_SIGNAL_COLUMN, RSI_STRENGTH_COLUMN, rsi_signal_record, rsi_signals};
