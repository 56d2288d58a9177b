//! MACD histogram crossovers.
//!
//! A histogram moving from non-positive to positive marks bullish momentum
//! onset (Buy); from non-negative to negative, bearish onset (Sell).

use super::core::{Signal, SignalRecord};
use crate::error::Result;
use crate::table::PriceTable;
use crate::validate::require_column;
use polars::prelude::*;

pub const MACD_SIGNAL_COLUMN: &str = "MACD Signal";
pub const MACD_STRENGTH_COLUMN: &str = "MACD Strength";

/// One record per row; the strength of a crossing is the histogram height.
pub fn macd_crossovers(histogram: &[f64]) -> Vec<SignalRecord> {
    let mut out = vec![SignalRecord::hold(); histogram.len()];
    for i in 1..histogram.len() {
        let (previous, current) = (histogram[i - 1], histogram[i]);
        if previous <= 0.0 && current > 0.0 {
            out[i] = SignalRecord::new(Signal::Buy, current.abs());
        } else if previous >= 0.0 && current < 0.0 {
            out[i] = SignalRecord::new(Signal::Sell, current.abs());
        }
    }
    out
}

impl PriceTable {
    /// Return a new table with a -1/0/+1 "MACD Signal" column and its
    /// "MACD Strength" (histogram height at the crossing, 0 elsewhere).
    pub fn with_macd_crossover_signal(&self, histogram_column: &str) -> Result<PriceTable> {
        require_column(self.df(), histogram_column)?;
        let records = macd_crossovers(&self.values(histogram_column)?);

        let signal: Vec<i32> = records.iter().map(|r| r.signal.as_i32()).collect();
        let strength: Vec<f64> = records.iter().map(|r| r.strength).collect();
        self.with_series(Series::new(MACD_SIGNAL_COLUMN.into(), signal))?
            .with_series(Series::new(MACD_STRENGTH_COLUMN.into(), strength))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crossovers() {
        let records = macd_crossovers(&[-1.0, 0.0, 0.5, 0.2, -0.3, -0.1]);
        let signals: Vec<Signal> = records.iter().map(|r| r.signal).collect();
        assert_eq!(
            signals,
            vec![
                Signal::Hold,
                Signal::Hold,
                Signal::Buy,
                Signal::Hold,
                Signal::Sell,
                Signal::Hold
            ]
        );
        assert!((records[2].strength - 0.5).abs() < 1e-12);
        assert!((records[4].strength - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_nan_rows_never_cross() {
        let records = macd_crossovers(&[f64::NAN, 1.0, f64::NAN, -1.0]);
        assert!(records.iter().all(|r| r.signal == Signal::Hold));
    }

    #[test]
    fn test_table_carries_crossover_strength() -> anyhow::Result<()> {
        let table = PriceTable::new(df!("Hist" => [-0.4, 0.25, 0.1, -0.2])?)?;
        let derived = table.with_macd_crossover_signal("Hist")?;

        let signal: Vec<i32> = derived
            .df()
            .column(MACD_SIGNAL_COLUMN)?
            .as_materialized_series()
            .i32()?
            .into_no_null_iter()
            .collect();
        assert_eq!(signal, vec![0, 1, 0, -1]);
        assert_eq!(
            derived.values(MACD_STRENGTH_COLUMN)?,
            vec![0.0, 0.25, 0.0, 0.2]
        );
        Ok(())
    }
}
