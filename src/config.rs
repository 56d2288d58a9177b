use crate::error::{IndicatorError, Result};
use crate::table::{ColumnMap, Field};
use crate::validate::require_period;
use anyhow::Context;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Per-call parameters for every indicator plus the signal thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorConfig {
    #[serde(default)]
    pub columns: ColumnMap,
    #[serde(default)]
    pub rsi: RsiParams,
    #[serde(default)]
    pub macd: MacdParams,
    #[serde(default)]
    pub roc: RocParams,
    #[serde(default)]
    pub stochastic: StochasticParams,
    #[serde(default)]
    pub mfi: MfiParams,
    #[serde(default)]
    pub thresholds: SignalThresholds,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RsiParams {
    #[serde(default = "default_price_column")]
    pub column: String,
    #[serde(default = "default_rsi_period")]
    pub period: usize,
}

/// MACD periods; `fast` must be shorter than `slow`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdParams {
    #[serde(default = "default_price_column")]
    pub column: String,
    #[serde(default = "default_macd_fast")]
    pub fast: usize,
    #[serde(default = "default_macd_slow")]
    pub slow: usize,
    #[serde(default = "default_macd_signal")]
    pub signal: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RocParams {
    #[serde(default = "default_price_column")]
    pub column: String,
    #[serde(default = "default_roc_period")]
    pub period: usize,
}

/// Stochastic oscillator; `column` is the close-like price, High and Low come
/// from the table's column map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StochasticParams {
    #[serde(default = "default_price_column")]
    pub column: String,
    #[serde(default = "default_stochastic_period")]
    pub period: usize,
    #[serde(default = "default_stochastic_smoothing")]
    pub smoothing: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MfiParams {
    #[serde(default = "default_price_column")]
    pub column: String,
    #[serde(default = "default_mfi_period")]
    pub period: usize,
}

/// RSI decision thresholds, `0 < buy_limit < sell_limit < 100`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalThresholds {
    #[serde(default = "default_buy_limit")]
    pub buy_limit: f64,
    #[serde(default = "default_sell_limit")]
    pub sell_limit: f64,
}

fn default_price_column() -> String {
    Field::AdjClose.default_column().to_string()
}

fn default_rsi_period() -> usize {
    14
}

fn default_macd_fast() -> usize {
    12
}
fn default_macd_slow() -> usize {
    26
}
fn default_macd_signal() -> usize {
    9
}

fn default_roc_period() -> usize {
    15
}

fn default_stochastic_period() -> usize {
    14
}
fn default_stochastic_smoothing() -> usize {
    3
}

fn default_mfi_period() -> usize {
    14
}

fn default_buy_limit() -> f64 {
    30.0 // Oversold below
}
fn default_sell_limit() -> f64 {
    70.0 // Overbought above
}

impl Default for RsiParams {
    fn default() -> Self {
        Self {
            column: default_price_column(),
            period: default_rsi_period(),
        }
    }
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            column: default_price_column(),
            fast: default_macd_fast(),
            slow: default_macd_slow(),
            signal: default_macd_signal(),
        }
    }
}

impl Default for RocParams {
    fn default() -> Self {
        Self {
            column: default_price_column(),
            period: default_roc_period(),
        }
    }
}

impl Default for StochasticParams {
    fn default() -> Self {
        Self {
            column: default_price_column(),
            period: default_stochastic_period(),
            smoothing: default_stochastic_smoothing(),
        }
    }
}

impl Default for MfiParams {
    fn default() -> Self {
        Self {
            column: default_price_column(),
            period: default_mfi_period(),
        }
    }
}

impl Default for SignalThresholds {
    fn default() -> Self {
        Self {
            buy_limit: default_buy_limit(),
            sell_limit: default_sell_limit(),
        }
    }
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            columns: ColumnMap::default(),
            rsi: RsiParams::default(),
            macd: MacdParams::default(),
            roc: RocParams::default(),
            stochastic: StochasticParams::default(),
            mfi: MfiParams::default(),
            thresholds: SignalThresholds::default(),
        }
    }
}

impl RsiParams {
    pub fn new(column: impl Into<String>, period: usize) -> Self {
        Self {
            column: column.into(),
            period,
        }
    }

    pub fn validate(&self) -> Result<()> {
        require_period("rsi.period", self.period)
    }
}

impl MacdParams {
    pub fn new(column: impl Into<String>, fast: usize, slow: usize, signal: usize) -> Self {
        Self {
            column: column.into(),
            fast,
            slow,
            signal,
        }
    }

    pub fn validate(&self) -> Result<()> {
        require_period("macd.fast", self.fast)?;
        require_period("macd.slow", self.slow)?;
        require_period("macd.signal", self.signal)?;
        if self.fast >= self.slow {
            return Err(IndicatorError::invalid_parameter(
                "macd.fast",
                format!(
                    "fast period {} must be shorter than slow period {}",
                    self.fast, self.slow
                ),
            ));
        }
        Ok(())
    }
}

impl RocParams {
    pub fn new(column: impl Into<String>, period: usize) -> Self {
        Self {
            column: column.into(),
            period,
        }
    }

    pub fn validate(&self) -> Result<()> {
        require_period("roc.period", self.period)
    }
}

impl StochasticParams {
    pub fn new(column: impl Into<String>, period: usize, smoothing: usize) -> Self {
        Self {
            column: column.into(),
            period,
            smoothing,
        }
    }

    pub fn validate(&self) -> Result<()> {
        require_period("stochastic.period", self.period)?;
        require_period("stochastic.smoothing", self.smoothing)
    }
}

impl MfiParams {
    pub fn new(column: impl Into<String>, period: usize) -> Self {
        Self {
            column: column.into(),
            period,
        }
    }

    pub fn validate(&self) -> Result<()> {
        require_period("mfi.period", self.period)
    }
}

impl SignalThresholds {
    /// Thresholds checked on construction.
    pub fn new(buy_limit: f64, sell_limit: f64) -> Result<Self> {
        let thresholds = Self {
            buy_limit,
            sell_limit,
        };
        thresholds.validate()?;
        Ok(thresholds)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.buy_limit > 0.0 && self.buy_limit < 100.0) {
            return Err(IndicatorError::invalid_parameter(
                "buy_limit",
                format!("{} must lie strictly between 0 and 100", self.buy_limit),
            ));
        }
        if !(self.sell_limit > 0.0 && self.sell_limit < 100.0) {
            return Err(IndicatorError::invalid_parameter(
                "sell_limit",
                format!("{} must lie strictly between 0 and 100", self.sell_limit),
            ));
        }
        if self.buy_limit >= self.sell_limit {
            return Err(IndicatorError::invalid_parameter(
                "buy_limit",
                format!(
                    "buy limit {} must be below sell limit {}",
                    self.buy_limit, self.sell_limit
                ),
            ));
        }
        Ok(())
    }
}

impl IndicatorConfig {
    /// Point every indicator at the same price column.
    pub fn with_price_column(mut self, column: &str) -> Self {
        self.rsi.column = column.to_string();
        self.macd.column = column.to_string();
        self.roc.column = column.to_string();
        self.stochastic.column = column.to_string();
        self.mfi.column = column.to_string();
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.rsi.validate()?;
        self.macd.validate()?;
        self.roc.validate()?;
        self.stochastic.validate()?;
        self.mfi.validate()?;
        self.thresholds.validate()
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let config: IndicatorConfig =
            serde_json::from_str(json).context("Failed to parse indicator config")?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file, falling back to defaults when it does not exist.
    pub fn load_from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(
                "Config file {} not found, using default indicator parameters",
                path.display()
            );
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_json(&config_str)?;
        info!("Loaded indicator config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = IndicatorConfig::default();
        assert_eq!(config.rsi.period, 14);
        assert_eq!(config.rsi.column, "Adj Close");
        assert_eq!((config.macd.fast, config.macd.slow, config.macd.signal), (12, 26, 9));
        assert_eq!(config.roc.period, 15);
        assert_eq!((config.stochastic.period, config.stochastic.smoothing), (14, 3));
        assert_eq!(config.mfi.period, 14);
        assert_eq!(config.thresholds.buy_limit, 30.0);
        assert_eq!(config.thresholds.sell_limit, 70.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = IndicatorConfig::from_json(r#"{"rsi": {"period": 10}}"#).unwrap();
        assert_eq!(config.rsi.period, 10);
        assert_eq!(config.rsi.column, "Adj Close");
        assert_eq!(config.macd, MacdParams::default());
    }

    #[test]
    fn test_invalid_json_thresholds_rejected() {
        let result =
            IndicatorConfig::from_json(r#"{"thresholds": {"buy_limit": 80, "sell_limit": 70}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_macd_non_monotonic_periods() {
        let err = MacdParams::new("Close", 26, 12, 9).validate().unwrap_err();
        assert!(matches!(err, IndicatorError::InvalidParameter { .. }));
        assert!(MacdParams::new("Close", 12, 12, 9).validate().is_err());
    }

    #[test]
    fn test_zero_period_rejected() {
        assert!(RsiParams::new("Close", 0).validate().is_err());
        assert!(StochasticParams::new("Close", 14, 0).validate().is_err());
    }

    #[test]
    fn test_threshold_bounds() {
        assert!(SignalThresholds::new(30.0, 70.0).is_ok());
        assert!(SignalThresholds::new(0.0, 70.0).is_err());
        assert!(SignalThresholds::new(30.0, 100.0).is_err());
        assert!(SignalThresholds::new(70.0, 30.0).is_err());
        assert!(SignalThresholds::new(f64::NAN, 70.0).is_err());
    }

    #[test]
    fn test_with_price_column() {
        let config = IndicatorConfig::default().with_price_column("Close");
        assert_eq!(config.rsi.column, "Close");
        assert_eq!(config.mfi.column, "Close");
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = IndicatorConfig::load_from_file("does/not/exist.json").unwrap();
        assert_eq!(config, IndicatorConfig::default());
    }
}
