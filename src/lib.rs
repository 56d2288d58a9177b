//! Momentum indicators (RSI, MACD histogram, ROC, Stochastic, MFI) over an
//! OHLCV time series, plus threshold-based buy/sell signals.
//!
//! ```no_run
//! use momentum_indicators::{MomentumAnalysis, loader::load_split_json};
//!
//! let table = load_split_json(std::fs::File::open("stock_data.json")?)?;
//! let derived = MomentumAnalysis::default().run(&table)?;
//! println!("{}", derived.df().tail(Some(5)));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod indicators;
pub mod loader;
pub mod signals;
pub mod table;
pub mod validate;

pub use analysis::{MomentumAnalysis, MomentumSnapshot};
pub use config::{
    IndicatorConfig, MacdParams, MfiParams, RocParams, RsiParams, SignalThresholds,
    StochasticParams,
};
pub use error::{IndicatorError, Result};
pub use indicators::Indicator;
pub use signals::{Signal, SignalRecord};
pub use table::{Bar, ColumnMap, Field, PriceTable};
pub use validate::require_column;
