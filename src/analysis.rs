//! Momentum bucket: every indicator plus the RSI and MACD signals in one pass.

use crate::config::IndicatorConfig;
use crate::error::Result;
use crate::indicators::{Indicator, RsiZone, check_inputs, rsi_zone};
use crate::signals::{
    MACD_SIGNAL_COLUMN, MACD_STRENGTH_COLUMN, RSI_SIGNAL_COLUMN, RSI_STRENGTH_COLUMN, Signal,
    SignalRecord,
};
use crate::table::PriceTable;
use log::info;
use serde::{Deserialize, Serialize};

/// Latest-row view of an analysed table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentumSnapshot {
    pub rsi: f64,
    pub macd_histogram: f64,
    pub roc: f64,
    pub stochastic: f64,
    pub mfi: f64,
    pub rsi_signal: SignalRecord,
    pub macd_signal: SignalRecord,
}

impl MomentumSnapshot {
    pub fn rsi_zone(&self) -> RsiZone {
        rsi_zone(self.rsi)
    }
}

pub struct MomentumAnalysis {
    config: IndicatorConfig,
}

impl MomentumAnalysis {
    pub fn new(config: IndicatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IndicatorConfig {
        &self.config
    }

    fn indicators(&self) -> [&dyn Indicator; 5] {
        [
            &self.config.rsi,
            &self.config.macd,
            &self.config.roc,
            &self.config.stochastic,
            &self.config.mfi,
        ]
    }

    /// Compute all five indicators and both signal sets onto a new table.
    /// Every input is checked before anything is computed, so a failure
    /// returns no partial result.
    ///
    /// High, Low and Volume are looked up through the configured column map,
    /// which replaces whatever map the table was built with.
    pub fn run(&self, table: &PriceTable) -> Result<PriceTable> {
        self.config.thresholds.validate()?;
        let table = PriceTable::with_columns(table.df().clone(), self.config.columns.clone())?;
        for indicator in self.indicators() {
            check_inputs(indicator, &table)?;
        }

        let mut derived = table;
        for indicator in self.indicators() {
            derived = derived.with_indicator(indicator)?;
        }

        let derived = derived
            .with_rsi_signal(self.config.rsi.output_column(), &self.config.thresholds)?
            .with_macd_crossover_signal(self.config.macd.output_column())?;

        info!(
            "Momentum analysis complete: {} rows, {} columns",
            derived.height(),
            derived.df().width()
        );
        Ok(derived)
    }

    /// Run the analysis and return the last row's readings.
    pub fn snapshot(&self, table: &PriceTable) -> Result<MomentumSnapshot> {
        self.snapshot_of(&self.run(table)?)
    }

    /// Last row's readings of a table already produced by [`run`](Self::run).
    pub fn snapshot_of(&self, derived: &PriceTable) -> Result<MomentumSnapshot> {
        let last = |column: &str| -> Result<f64> {
            Ok(derived
                .values(column)?
                .last()
                .copied()
                .unwrap_or(f64::NAN))
        };
        let last_record = |signal: &str, strength: &str| -> Result<SignalRecord> {
            let direction = last(signal)?;
            if direction.is_nan() {
                return Ok(SignalRecord::hold());
            }
            Ok(SignalRecord::new(
                Signal::from_direction(direction),
                last(strength)?,
            ))
        };

        Ok(MomentumSnapshot {
            rsi: last(self.config.rsi.output_column())?,
            macd_histogram: last(self.config.macd.output_column())?,
            roc: last(self.config.roc.output_column())?,
            stochastic: last(self.config.stochastic.output_column())?,
            mfi: last(self.config.mfi.output_column())?,
            rsi_signal: last_record(RSI_SIGNAL_COLUMN, RSI_STRENGTH_COLUMN)?,
            macd_signal: last_record(MACD_SIGNAL_COLUMN, MACD_STRENGTH_COLUMN)?,
        })
    }
}

impl Default for MomentumAnalysis {
    fn default() -> Self {
        Self::new(IndicatorConfig::default())
    }
}
