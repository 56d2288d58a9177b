//! RSI threshold signals.
//!
//! Below `buy_limit` the asset reads oversold and the signal is Buy, with the
//! strength scaling how far RSI sits under the limit. Above `sell_limit` it
//! reads overbought and the signal is Sell.

use super::core::{Signal, SignalRecord};
use crate::config::SignalThresholds;
use crate::error::Result;
use crate::table::PriceTable;
use crate::validate::require_column;
use log::debug;
use polars::prelude::*;

pub const RSI_SIGNAL_COLUMN: &str = "RSI Signal";
pub const RSI_STRENGTH_COLUMN: &str = "RSI Strength";

/// Signal for one RSI reading. Thresholds are assumed valid; NaN holds.
pub fn rsi_signal_record(rsi: f64, thresholds: &SignalThresholds) -> SignalRecord {
    let SignalThresholds {
        buy_limit,
        sell_limit,
    } = *thresholds;

    if rsi < buy_limit {
        SignalRecord::new(Signal::Buy, (buy_limit - rsi) * 100.0 / buy_limit)
    } else if rsi > sell_limit {
        SignalRecord::new(Signal::Sell, (rsi - sell_limit) * 100.0 / (100.0 - sell_limit))
    } else {
        SignalRecord::hold()
    }
}

/// Signal for every row of an RSI series.
pub fn rsi_signals(rsi: &[f64], thresholds: &SignalThresholds) -> Result<Vec<SignalRecord>> {
    thresholds.validate()?;
    Ok(rsi
        .iter()
        .map(|&value| rsi_signal_record(value, thresholds))
        .collect())
}

impl PriceTable {
    /// Return a new table with "RSI Signal" (-1/0/+1) and "RSI Strength"
    /// columns derived from `rsi_column`.
    pub fn with_rsi_signal(
        &self,
        rsi_column: &str,
        thresholds: &SignalThresholds,
    ) -> Result<PriceTable> {
        thresholds.validate()?;
        require_column(self.df(), rsi_column)?;

        let records = rsi_signals(&self.values(rsi_column)?, thresholds)?;
        let buys = records.iter().filter(|r| r.signal == Signal::Buy).count();
        let sells = records.iter().filter(|r| r.signal == Signal::Sell).count();
        debug!(
            "RSI signals from {}: {} buy, {} sell, {} rows",
            rsi_column,
            buys,
            sells,
            records.len()
        );

        let signal: Vec<i32> = records.iter().map(|r| r.signal.as_i32()).collect();
        let strength: Vec<f64> = records.iter().map(|r| r.strength).collect();
        self.with_series(Series::new(RSI_SIGNAL_COLUMN.into(), signal))?
            .with_series(Series::new(RSI_STRENGTH_COLUMN.into(), strength))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi_signals_buy_hold_sell() {
        let records = rsi_signals(&[25.0, 50.0, 75.0], &SignalThresholds::default()).unwrap();
        let signals: Vec<Signal> = records.iter().map(|r| r.signal).collect();
        assert_eq!(signals, vec![Signal::Buy, Signal::Hold, Signal::Sell]);
        assert!((records[0].strength - 50.0 / 3.0).abs() < 1e-9);
        assert_eq!(records[1].strength, 0.0);
        assert!((records[2].strength - 50.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_thresholds_are_exclusive() {
        let records = rsi_signals(&[30.0, 70.0], &SignalThresholds::default()).unwrap();
        assert!(records.iter().all(|r| r.signal == Signal::Hold));
    }

    #[test]
    fn test_extremes_give_full_strength() {
        let records = rsi_signals(&[0.0, 100.0], &SignalThresholds::default()).unwrap();
        assert!((records[0].strength - 100.0).abs() < 1e-9);
        assert!((records[1].strength - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_nan_rsi_holds() {
        let record = rsi_signal_record(f64::NAN, &SignalThresholds::default());
        assert_eq!(record, SignalRecord::hold());
    }

    #[test]
    fn test_invalid_thresholds_rejected() {
        let bad = SignalThresholds {
            buy_limit: 70.0,
            sell_limit: 30.0,
        };
        assert!(rsi_signals(&[50.0], &bad).is_err());
    }
}
