//! Ingestion of pandas "split"-oriented JSON price dumps.
//!
//! The market-data fetcher stores frames as `{"columns": [...], "index": [...],
//! "data": [[...], ...]}`. Column labels may be `["Adj Close", "AAPL"]` pairs,
//! in which case the first element is the field name, and every cell may be a
//! string.

use crate::error::{IndicatorError, Result};
use crate::table::{ColumnMap, PriceTable};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::{debug, warn};
use polars::prelude::*;
use serde::Deserialize;
use serde_json::Value;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct SplitFrame {
    columns: Vec<Value>,
    data: Vec<Vec<Value>>,
}

/// Parse a split-oriented JSON document into a chronologically sorted table.
pub fn load_split_json<R: Read>(reader: R) -> Result<PriceTable> {
    load_split_json_with(reader, ColumnMap::default())
}

pub fn load_split_json_with<R: Read>(reader: R, columns: ColumnMap) -> Result<PriceTable> {
    let frame: SplitFrame = serde_json::from_reader(reader)
        .map_err(|e| IndicatorError::InvalidInput(format!("malformed split JSON: {e}")))?;

    let names = frame
        .columns
        .iter()
        .map(column_label)
        .collect::<Result<Vec<String>>>()?;

    for (row, cells) in frame.data.iter().enumerate() {
        if cells.len() != names.len() {
            return Err(IndicatorError::InvalidInput(format!(
                "row {row} has {} cells, expected {}",
                cells.len(),
                names.len()
            )));
        }
    }

    let mut built = Vec::with_capacity(names.len());
    for (idx, name) in names.iter().enumerate() {
        let cells = frame.data.iter().map(|row| &row[idx]);
        let series = if *name == columns.index {
            let millis = cells
                .map(parse_timestamp_millis)
                .collect::<Result<Vec<i64>>>()?;
            Series::new(name.as_str().into(), millis)
                .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?
        } else {
            let values: Vec<Option<f64>> = cells.map(parse_number).collect();
            Series::new(name.as_str().into(), values)
        };
        built.push(series.into_column());
    }

    let mut df = DataFrame::new(built)?;
    if names.contains(&columns.index) {
        df = df.sort([columns.index.as_str()], SortMultipleOptions::default())?;
    } else {
        warn!("No {} column in split JSON, keeping row order", columns.index);
    }
    debug!("Loaded {} rows from split JSON", df.height());

    PriceTable::with_columns(df, columns)
}

fn column_label(label: &Value) -> Result<String> {
    match label {
        Value::String(s) => Ok(s.clone()),
        Value::Array(parts) => match parts.first() {
            Some(Value::String(s)) => Ok(s.clone()),
            _ => Err(IndicatorError::InvalidInput(format!(
                "unsupported column label {label}"
            ))),
        },
        _ => Err(IndicatorError::InvalidInput(format!(
            "unsupported column label {label}"
        ))),
    }
}

fn parse_number(cell: &Value) -> Option<f64> {
    match cell {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn parse_timestamp_millis(cell: &Value) -> Result<i64> {
    match cell {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| IndicatorError::InvalidInput(format!("bad timestamp {n}"))),
        Value::String(s) => parse_date_str(s.trim())
            .ok_or_else(|| IndicatorError::InvalidInput(format!("bad timestamp {s:?}"))),
        other => Err(IndicatorError::InvalidInput(format!(
            "bad timestamp {other}"
        ))),
    }
}

fn parse_date_str(s: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc().timestamp_millis());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.and_utc().timestamp_millis());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Field;

    const SAMPLE: &str = r#"{
        "columns": [["Date", ""], ["Adj Close", "AAPL"], ["Close", "AAPL"], ["Volume", "AAPL"]],
        "index": [0, 1, 2],
        "data": [
            ["2024-01-03 00:00:00", "11.5", "11.6", "1200"],
            ["2024-01-02 00:00:00", "10.5", "10.6", "1000"],
            ["2024-01-04 00:00:00", "n/a", "12.6", "900"]
        ]
    }"#;

    #[test]
    fn test_load_split_json_sorts_and_flattens_labels() {
        let table = load_split_json(SAMPLE.as_bytes()).unwrap();
        assert_eq!(
            table.df().get_column_names_str(),
            vec!["Date", "Adj Close", "Close", "Volume"]
        );
        let adj = table.field(Field::AdjClose).unwrap();
        assert_eq!(adj[0], 10.5);
        assert_eq!(adj[1], 11.5);
        assert!(adj[2].is_nan());
        assert_eq!(table.field(Field::Volume).unwrap(), vec![1000.0, 1200.0, 900.0]);
    }

    #[test]
    fn test_duplicate_dates_rejected() {
        let json = r#"{"columns": ["Date", "Close"], "data": [["2024-01-02", 1], ["2024-01-02", 2]]}"#;
        assert!(matches!(
            load_split_json(json.as_bytes()),
            Err(IndicatorError::UnorderedIndex { row: 1 })
        ));
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let json = r#"{"columns": ["Date", "Close"], "data": [["2024-01-02"]]}"#;
        assert!(matches!(
            load_split_json(json.as_bytes()),
            Err(IndicatorError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_bad_date_rejected() {
        let json = r#"{"columns": ["Date", "Close"], "data": [["yesterday", 1]]}"#;
        assert!(load_split_json(json.as_bytes()).is_err());
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date_str("1970-01-02"), Some(86_400_000));
        assert_eq!(parse_date_str("1970-01-01 00:00:01"), Some(1_000));
        assert_eq!(parse_date_str("1970-01-01T00:00:00+00:00"), Some(0));
    }
}
