// =============================================================================
// Rate of Change (ROC)
// =============================================================================
//
// ROC = (price[i] - price[i-P]) * 100 / price[i-P]
//
// The first P rows are NaN, and so is any row whose base price is zero.

use super::Indicator;
use crate::config::RocParams;
use crate::error::Result;
use crate::table::{ColumnMap, PriceTable};
use log::debug;
use polars::prelude::*;

pub const ROC_COLUMN: &str = "ROC";

pub fn roc(prices: &[f64], period: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; prices.len()];
    if period == 0 {
        return out;
    }
    for i in period..prices.len() {
        let base = prices[i - period];
        if base != 0.0 {
            out[i] = (prices[i] - base) * 100.0 / base;
        }
    }
    out
}

impl Indicator for RocParams {
    fn name(&self) -> &'static str {
        "ROC"
    }

    fn output_column(&self) -> &str {
        ROC_COLUMN
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
            "ROC over {} ({} rows, period {})",
            self.column,
            prices.len(),
            self.period
        );
        Ok(Series::new(
            self.output_column().into(),
            roc(&prices, self.period),
        ))
    }
}
