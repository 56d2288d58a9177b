// =============================================================================
// Relative Strength Index (RSI), simple-average variant
// =============================================================================
//
// delta    = price[i] - price[i-1]
// gain     = max(delta, 0),  loss = max(-delta, 0)
// avg_*    = simple moving average over the trailing `period` rows
// RSI      = 100 - 100 / (1 + avg_gain / avg_loss)
//
// A window with no losses saturates to 100.
// =============================================================================

use super::Indicator;
use super::rolling::{diff, rolling_mean};
use crate::config::RsiParams;
use crate::error::Result;
use crate::table::{ColumnMap, PriceTable};
use log::debug;
use polars::prelude::*;

pub const RSI_COLUMN: &str = "RSI";

/// Overbought / oversold reading of a single RSI value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsiZone {
    Overbought,
    Oversold,
    Neutral,
}

/// Full RSI series, same length as `prices`. The first `period + 1` rows are
/// NaN: the price change is undefined at row 0 and the window needs `period`
/// changes behind the current row.
pub fn rsi(prices: &[f64], period: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; prices.len()];
    if period == 0 {
        return out;
    }

    let delta = diff(prices);
    let gains: Vec<f64> = delta
        .iter()
        .map(|&d| if d.is_nan() { d } else { d.max(0.0) })
        .collect();
    let losses: Vec<f64> = delta
        .iter()
        .map(|&d| if d.is_nan() { d } else { (-d).max(0.0) })
        .collect();

    let avg_gain = rolling_mean(&gains, period);
    let avg_loss = rolling_mean(&losses, period);

    for i in (period + 1)..prices.len() {
        out[i] = rsi_from_averages(avg_gain[i], avg_loss[i]);
    }
    out
}

/// Convert averages into RSI; zero average loss saturates to 100.
pub(crate) fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_gain.is_nan() || avg_loss.is_nan() {
        return f64::NAN;
    }
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    // Running window sums can drift a hair below zero.
    (100.0 - 100.0 / (1.0 + rs)).clamp(0.0, 100.0)
}

/// Classify with the conventional 70 / 30 bands. NaN reads as neutral.
pub fn rsi_zone(value: f64) -> RsiZone {
    if value > 70.0 {
        RsiZone::Overbought
    } else if value < 30.0 {
        RsiZone::Oversold
    } else {
        RsiZone::Neutral
    }
}

impl Indicator for RsiParams {
    fn name(&self) -> &'static str {
        "RSI"
    }

    fn output_column(&self) -> &str {
        RSI_COLUMN
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
            "RSI over {} ({} rows, period {})",
            self.column,
            prices.len(),
            self.period
        );
        Ok(Series::new(
            self.output_column().into(),
            rsi(&prices, self.period),
        ))
    }
}
