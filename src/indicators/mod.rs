//! Indicator Engine
//!
//! Stateless momentum indicators. Each one exists twice: as a pure function
//! over `&[f64]` slices, and as an [`Indicator`] implementation on its
//! parameter record that reads columns from a [`PriceTable`].

pub mod macd;
pub mod mfi;
pub mod roc;
pub mod rolling;
pub mod rsi;
pub mod stochastic;

pub use macd::{MACD_HISTOGRAM_COLUMN, MacdSeries, macd, macd_histogram};
pub use mfi::{MFI_COLUMN, money_flow_index, raw_money_flow};
pub use roc::{ROC_COLUMN, roc};
pub use rsi::{RSI_COLUMN, RsiZone, rsi, rsi_zone};
pub use stochastic::{STOCHASTIC_COLUMN, stochastic, stochastic_k};

use crate::error::Result;
use crate::table::{ColumnMap, PriceTable};
use crate::validate::{require_column, require_rows};
use log::debug;
use polars::prelude::Series;

/// A derived column computed from one table.
pub trait Indicator {
    fn name(&self) -> &'static str;

    /// Name of the column the result is stored under.
    fn output_column(&self) -> &str;

    /// Every column `compute` reads, resolved through the table's column map.
    fn required_columns(&self, columns: &ColumnMap) -> Vec<String>;

    fn validate_params(&self) -> Result<()>;

    /// Compute the derived series. Callers normally go through
    /// [`PriceTable::with_indicator`], which runs the validation gate first.
    fn compute(&self, table: &PriceTable) -> Result<Series>;
}

/// Run the full validation gate for `indicator` against `table`: parameters,
/// then every required column, then a non-empty series.
pub fn check_inputs(indicator: &dyn Indicator, table: &PriceTable) -> Result<()> {
    indicator.validate_params()?;
    let required = indicator.required_columns(table.columns());
    for column in &required {
        require_column(table.df(), column)?;
    }
    if let Some(first) = required.first() {
        require_rows(table.df(), first)?;
    }
    Ok(())
}

impl PriceTable {
    /// Validate, compute, and return the derived series without attaching it.
    pub fn indicator_series(&self, indicator: &dyn Indicator) -> Result<Series> {
        check_inputs(indicator, self)?;
        debug!("Computing {} into {}", indicator.name(), indicator.output_column());
        indicator.compute(self)
    }

    /// Return a new table with the indicator's column appended.
    pub fn with_indicator(&self, indicator: &dyn Indicator) -> Result<PriceTable> {
        let series = self.indicator_series(indicator)?;
        self.with_series(series)
    }
}
