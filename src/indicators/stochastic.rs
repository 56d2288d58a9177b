//! Stochastic oscillator, reported as the smoothed %D line.

use super::Indicator;
use super::rolling::{rolling_max, rolling_mean, rolling_min};
use crate::config::StochasticParams;
use crate::error::Result;
use crate::table::{ColumnMap, Field, PriceTable};
use crate::validate::require_same_length;
use log::debug;
use polars::prelude::*;

pub const STOCHASTIC_COLUMN: &str = "Stochastic %D";

/// %K: where the close sits inside the trailing high/low range, in percent.
/// A flat range (high == low) is NaN.
pub fn stochastic_k(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    period: usize,
) -> Result<Vec<f64>> {
    require_same_length(&[("close", close), ("high", high), ("low", low)])?;
    let highest = rolling_max(high, period);
    let lowest = rolling_min(low, period);

    Ok(close
        .iter()
        .zip(highest.iter().zip(&lowest))
        .map(|(&c, (&h, &l))| {
            let range = h - l;
            if range == 0.0 {
                f64::NAN
            } else {
                (c - l) * 100.0 / range
            }
        })
        .collect())
}

/// %D: simple moving average of %K over `smoothing` rows.
pub fn stochastic(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    period: usize,
    smoothing: usize,
) -> Result<Vec<f64>> {
    Ok(rolling_mean(&stochastic_k(high, low, close, period)?, smoothing))
}

impl Indicator for StochasticParams {
    fn name(&self) -> &'static str {
        "Stochastic"
    }

    fn output_column(&self) -> &str {
        STOCHASTIC_COLUMN
    }

    fn required_columns(&self, columns: &ColumnMap) -> Vec<String> {
        vec![
            columns.column(Field::High).to_string(),
            columns.column(Field::Low).to_string(),
            self.column.clone(),
        ]
    }

    fn validate_params(&self) -> Result<()> {
        self.validate()
    }

    fn compute(&self, table: &PriceTable) -> Result<Series> {
        let high = table.field(Field::High)?;
        let low = table.field(Field::Low)?;
        let close = table.values(&self.column)?;
        debug!(
            "Stochastic over {} ({} rows, period {}, smoothing {})",
            self.column,
            close.len(),
            self.period,
            self.smoothing
        );
        Ok(Series::new(
            self.output_column().into(),
            stochastic(&high, &low, &close, self.period, self.smoothing)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stochastic_k_position_in_range() {
        let high = [10.0, 12.0, 14.0];
        let low = [8.0, 9.0, 10.0];
        let close = [9.0, 11.0, 11.0];
        let k = stochastic_k(&high, &low, &close, 3).unwrap();
        assert!(k[0].is_nan() && k[1].is_nan());
        // range 8..14, close 11 => 50%
        assert!((k[2] - 50.0).abs() < 1e-12);
    }

    #[test]
    fn test_stochastic_d_smooths_k() {
        let high = [10.0, 11.0, 12.0, 13.0, 14.0, 15.0];
        let low = [9.0, 10.0, 11.0, 12.0, 13.0, 14.0];
        let close = [10.0, 11.0, 12.0, 13.0, 14.0, 15.0];
        let k = stochastic_k(&high, &low, &close, 2).unwrap();
        let d = stochastic(&high, &low, &close, 2, 3).unwrap();
        assert!(d[..3].iter().all(|v| v.is_nan()));
        for i in 3..6 {
            let expected = (k[i] + k[i - 1] + k[i - 2]) / 3.0;
            assert!((d[i] - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_stochastic_flat_market_is_nan() {
        let flat = [50.0; 20];
        let d = stochastic(&flat, &flat, &flat, 14, 3).unwrap();
        assert!(d.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_mismatched_lengths_rejected() {
        let err = stochastic(&[2.0, 3.0], &[1.0], &[1.5, 2.5], 1, 1).unwrap_err();
        assert!(matches!(err, crate::error::IndicatorError::InvalidInput(_)));
    }
}
