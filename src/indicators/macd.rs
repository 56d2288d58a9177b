//! MACD histogram: `(ema_fast - ema_slow) - ema(ema_fast - ema_slow, signal)`.
//!
//! EMAs are seeded with the first observation, so there is no warm-up NaN
//! region. Callers are expected to keep `fast < slow`; `MacdParams::validate`
//! enforces it on the table path.

use super::Indicator;
use super::rolling::ema;
use crate::config::MacdParams;
use crate::error::Result;
use crate::table::{ColumnMap, PriceTable};
use log::debug;
use polars::prelude::*;

pub const MACD_HISTOGRAM_COLUMN: &str = "MACD Histogram";

/// MACD line, signal line and histogram for one price series.
#[derive(Debug, Clone)]
pub struct MacdSeries {
    pub macd_line: Vec<f64>,
    pub signal_line: Vec<f64>,
    pub histogram: Vec<f64>,
}

pub fn macd(prices: &[f64], fast: usize, slow: usize, signal: usize) -> MacdSeries {
    let ema_fast = ema(prices, fast);
    let ema_slow = ema(prices, slow);
    let macd_line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();
    let signal_line = ema(&macd_line, signal);
    let histogram = macd_line
        .iter()
        .zip(&signal_line)
        .map(|(m, s)| m - s)
        .collect();

    MacdSeries {
        macd_line,
        signal_line,
        histogram,
    }
}

/// Histogram height only.
pub fn macd_histogram(prices: &[f64], fast: usize, slow: usize, signal: usize) -> Vec<f64> {
    macd(prices, fast, slow, signal).histogram
}

impl Indicator for MacdParams {
    fn name(&self) -> &'static str {
        "MACD"
    }

    fn output_column(&self) -> &str {
        MACD_HISTOGRAM_COLUMN
    }

    fn required_columns(&self, _columns: &ColumnMap) -> Vec<String> {
        vec![self.column.clone()]
    }

    fn validate_params(&self) -> Result<()> {
        self.validate()
    }

    fn compute(&self, table: &PriceTable) -> Result<Series> {
        let prices = table.values(&self.column)?;
        debug!(
            "MACD over {} ({} rows, {}/{}/{})",
            self.column,
            prices.len(),
            self.fast,
            self.slow,
            self.signal
        );
        Ok(Series::new(
            self.output_column().into(),
            macd_histogram(&prices, self.fast, self.slow, self.signal),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_macd_flat_series_is_zero() {
        let hist = macd_histogram(&[50.0; 40], 12, 26, 9);
        assert_eq!(hist.len(), 40);
        assert!(hist.iter().all(|&h| h == 0.0));
    }

    #[test]
    fn test_macd_defined_from_first_row() {
        let prices: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
        let out = macd(&prices, 3, 6, 4);
        assert_eq!(out.macd_line[0], 0.0);
        assert!(out.histogram.iter().all(|h| !h.is_nan()));
    }

    #[test]
    fn test_macd_step_turns_histogram_positive() {
        let mut prices = vec![100.0; 40];
        prices.extend(vec![120.0; 20]);
        let hist = macd_histogram(&prices, 12, 26, 9);
        assert!(hist[..40].iter().all(|&h| h <= 0.0));
        let first_positive = hist.iter().position(|&h| h > 0.0).unwrap();
        assert!((40..40 + 9).contains(&first_positive));
    }

    #[test]
    fn test_macd_line_matches_components() {
        let prices = [10.0, 11.0, 12.5, 12.0, 13.0, 12.2];
        let out = macd(&prices, 2, 4, 3);
        for i in 0..prices.len() {
            let expected = out.macd_line[i] - out.signal_line[i];
            assert!((out.histogram[i] - expected).abs() < 1e-12);
        }
    }
}
