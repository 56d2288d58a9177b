//! Column Validator
//!
//! Gate checks run before any indicator reads a column, so a malformed table
//! fails with one descriptive error instead of an all-NaN output.

use crate::error::{IndicatorError, Result};
use polars::prelude::DataFrame;

/// Fail with `MissingColumn` when `name` is not among the table's columns.
pub fn require_column(df: &DataFrame, name: &str) -> Result<()> {
    if df.get_column_names().iter().any(|c| c.as_str() == name) {
        Ok(())
    } else {
        Err(IndicatorError::missing_column(name))
    }
}

/// Fail with `EmptySeries` when the table has no rows.
pub fn require_rows(df: &DataFrame, column: &str) -> Result<()> {
    if df.height() == 0 {
        return Err(IndicatorError::empty_series(column));
    }
    Ok(())
}

/// Lookback periods must be at least one row.
pub fn require_period(parameter: &str, value: usize) -> Result<()> {
    if value == 0 {
        return Err(IndicatorError::invalid_parameter(
            parameter,
            "period must be greater than zero",
        ));
    }
    Ok(())
}

/// Parallel input slices must have one value per row.
pub fn require_same_length(inputs: &[(&str, &[f64])]) -> Result<()> {
    if let Some((first, expected)) = inputs.first().map(|(name, v)| (*name, v.len())) {
        for (name, values) in &inputs[1..] {
            if values.len() != expected {
                return Err(IndicatorError::InvalidInput(format!(
                    "{name} has {} rows, {first} has {expected}",
                    values.len()
                )));
            }
        }
    }
    Ok(())
}
