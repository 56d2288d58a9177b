//! Time series table keyed by an ascending timestamp index.
//!
//! `PriceTable` wraps a polars [`DataFrame`]. Transformations never touch the
//! receiver; every derived column lands in a new table owned by the caller.

use crate::error::{IndicatorError, Result};
use crate::validate::require_column;
use chrono::{DateTime, Utc};
use log::debug;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Field roles an indicator may read from a price bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    Open,
    High,
    Low,
    Close,
    AdjClose,
    Volume,
}

impl Field {
    /// Conventional column name for this role.
    pub fn default_column(&self) -> &'static str {
        match self {
            Field::Open => "Open",
            Field::High => "High",
            Field::Low => "Low",
            Field::Close => "Close",
            Field::AdjClose => "Adj Close",
            Field::Volume => "Volume",
        }
    }
}

/// Maps field roles onto the concrete column names of a table.
///
/// Indicators resolve High, Low and Volume through this map. The price
/// column each indicator reads is named by its own parameter record, so the
/// `close`/`adj_close` entries here never override it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMap {
    #[serde(default = "default_index")]
    pub index: String,
    #[serde(default = "default_open")]
    pub open: String,
    #[serde(default = "default_high")]
    pub high: String,
    #[serde(default = "default_low")]
    pub low: String,
    #[serde(default = "default_close")]
    pub close: String,
    #[serde(default = "default_adj_close")]
    pub adj_close: String,
    #[serde(default = "default_volume")]
    pub volume: String,
}

fn default_index() -> String {
    "Date".to_string()
}
fn default_open() -> String {
    Field::Open.default_column().to_string()
}
fn default_high() -> String {
    Field::High.default_column().to_string()
}
fn default_low() -> String {
    Field::Low.default_column().to_string()
}
fn default_close() -> String {
    Field::Close.default_column().to_string()
}
fn default_adj_close() -> String {
    Field::AdjClose.default_column().to_string()
}
fn default_volume() -> String {
    Field::Volume.default_column().to_string()
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            index: default_index(),
            open: default_open(),
            high: default_high(),
            low: default_low(),
            close: default_close(),
            adj_close: default_adj_close(),
            volume: default_volume(),
        }
    }
}

impl ColumnMap {
    pub fn column(&self, field: Field) -> &str {
        match field {
            Field::Open => &self.open,
            Field::High => &self.high,
            Field::Low => &self.low,
            Field::Close => &self.close,
            Field::AdjClose => &self.adj_close,
            Field::Volume => &self.volume,
        }
    }
}

/// One OHLCV observation.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: f64,
    pub volume: f64,
}

#[derive(Debug, Clone)]
pub struct PriceTable {
    df: DataFrame,
    columns: ColumnMap,
}

impl PriceTable {
    /// Wrap a frame using the conventional column names.
    pub fn new(df: DataFrame) -> Result<Self> {
        Self::with_columns(df, ColumnMap::default())
    }

    /// Wrap a frame with an explicit role mapping. When the index column is
    /// present its timestamps must be strictly ascending.
    pub fn with_columns(df: DataFrame, columns: ColumnMap) -> Result<Self> {
        if require_column(&df, &columns.index).is_ok() {
            check_ascending(&df, &columns.index)?;
        }
        debug!(
            "PriceTable: {} rows, columns {:?}",
            df.height(),
            df.get_column_names_str()
        );
        Ok(Self { df, columns })
    }

    /// Build a table from typed bars using the conventional column names.
    pub fn from_bars(bars: &[Bar]) -> Result<Self> {
        let map = ColumnMap::default();
        let millis: Vec<i64> = bars.iter().map(|b| b.timestamp.timestamp_millis()).collect();
        let index = Series::new(map.index.as_str().into(), millis)
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;

        let column = |field: Field, f: fn(&Bar) -> f64| {
            Column::new(
                map.column(field).into(),
                bars.iter().map(f).collect::<Vec<f64>>(),
            )
        };

        let df = DataFrame::new(vec![
            index.into_column(),
            column(Field::Open, |b| b.open),
            column(Field::High, |b| b.high),
            column(Field::Low, |b| b.low),
            column(Field::Close, |b| b.close),
            column(Field::AdjClose, |b| b.adj_close),
            column(Field::Volume, |b| b.volume),
        ])?;

        Self::with_columns(df, map)
    }

    pub fn df(&self) -> &DataFrame {
        &self.df
    }

    pub fn into_df(self) -> DataFrame {
        self.df
    }

    pub fn columns(&self) -> &ColumnMap {
        &self.columns
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    pub fn has_column(&self, name: &str) -> bool {
        require_column(&self.df, name).is_ok()
    }

    /// Read a numeric column as `f64`; nulls become NaN.
    pub fn values(&self, name: &str) -> Result<Vec<f64>> {
        require_column(&self.df, name)?;
        let series = self.df.column(name)?.as_materialized_series();
        let casted = if series.dtype() == &DataType::Float64 {
            series.clone()
        } else {
            series.cast(&DataType::Float64)?
        };
        Ok(casted
            .f64()?
            .into_iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect())
    }

    /// Read the column mapped to `field`.
    pub fn field(&self, field: Field) -> Result<Vec<f64>> {
        self.values(self.columns.column(field))
    }

    /// Return a new table with `series` appended, replacing any column of the
    /// same name. The receiver is left untouched.
    pub fn with_series(&self, series: Series) -> Result<Self> {
        if series.len() != self.df.height() {
            return Err(IndicatorError::InvalidInput(format!(
                "column {} has {} rows, table has {}",
                series.name(),
                series.len(),
                self.df.height()
            )));
        }
        let mut df = self.df.clone();
        df.with_column(series)?;
        Ok(Self {
            df,
            columns: self.columns.clone(),
        })
    }

    /// Return a new table with a float column appended.
    pub fn with_column(&self, name: &str, values: Vec<f64>) -> Result<Self> {
        self.with_series(Series::new(name.into(), values))
    }
}

fn check_ascending(df: &DataFrame, index: &str) -> Result<()> {
    let series = df.column(index)?.as_materialized_series();
    let physical = series.to_physical_repr().cast(&DataType::Int64)?;
    let stamps = physical.i64()?;

    let mut previous: Option<i64> = None;
    for (row, stamp) in stamps.into_iter().enumerate() {
        let stamp = stamp.ok_or(IndicatorError::UnorderedIndex { row })?;
        if let Some(prev) = previous {
            if stamp <= prev {
                return Err(IndicatorError::UnorderedIndex { row });
            }
        }
        previous = Some(stamp);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn bars(closes: &[f64]) -> Vec<Bar> {
        let start = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar {
                timestamp: start + Duration::days(i as i64),
                open: c,
                high: c + 1.0,
                low: c - 1.0,
                close: c,
                adj_close: c,
                volume: 1000.0,
            })
            .collect()
    }

    #[test]
    fn test_from_bars_layout() {
        let table = PriceTable::from_bars(&bars(&[10.0, 11.0, 12.0])).unwrap();
        assert_eq!(table.height(), 3);
        assert_eq!(
            table.df().get_column_names_str(),
            vec!["Date", "Open", "High", "Low", "Close", "Adj Close", "Volume"]
        );
        assert_eq!(table.field(Field::High).unwrap(), vec![11.0, 12.0, 13.0]);
    }

    #[test]
    fn test_descending_index_rejected() {
        let mut data = bars(&[10.0, 11.0, 12.0]);
        data.swap(1, 2);
        let err = PriceTable::from_bars(&data).unwrap_err();
        assert!(matches!(err, IndicatorError::UnorderedIndex { row: 2 }));
    }

    #[test]
    fn test_duplicate_timestamp_rejected() {
        let mut data = bars(&[10.0, 11.0]);
        data[1].timestamp = data[0].timestamp;
        assert!(PriceTable::from_bars(&data).is_err());
    }

    #[test]
    fn test_values_casts_integers_and_nulls() {
        let df = df!("Volume" => [Some(10i64), None, Some(30)]).unwrap();
        let table = PriceTable::new(df).unwrap();
        let values = table.values("Volume").unwrap();
        assert_eq!(values[0], 10.0);
        assert!(values[1].is_nan());
        assert_eq!(values[2], 30.0);
    }

    #[test]
    fn test_with_column_leaves_receiver_untouched() {
        let table = PriceTable::new(df!("Close" => [1.0, 2.0]).unwrap()).unwrap();
        let derived = table.with_column("Double", vec![2.0, 4.0]).unwrap();
        assert!(!table.has_column("Double"));
        assert!(derived.has_column("Double"));
    }

    #[test]
    fn test_with_column_length_mismatch() {
        let table = PriceTable::new(df!("Close" => [1.0, 2.0]).unwrap()).unwrap();
        assert!(matches!(
            table.with_column("Bad", vec![1.0]),
            Err(IndicatorError::InvalidInput(_))
        ));
    }
}
