//! Error types surfaced by indicator and signal computations.

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors reported to the caller before any derived output is produced.
///
/// Numeric edge cases inside a rolling window (zero denominators, flat
/// markets) are never errors; they resolve to a defined value in the output.
#[derive(Debug, Error)]
pub enum IndicatorError {
    /// A column the computation reads is not present in the table
    #[error("missing column: {column}")]
    MissingColumn { column: String },

    /// The input series has no rows
    #[error("empty series: column {column} has no rows")]
    EmptySeries { column: String },

    /// A parameter or threshold is out of its valid range
    #[error("invalid parameter {parameter}: {reason}")]
    InvalidParameter { parameter: String, reason: String },

    /// The timestamp index is not strictly ascending
    #[error("timestamp index is not strictly ascending at row {row}")]
    UnorderedIndex { row: usize },

    /// Malformed data handed in at the ingestion boundary
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

impl IndicatorError {
    pub fn missing_column(column: impl Into<String>) -> Self {
        IndicatorError::MissingColumn {
            column: column.into(),
        }
    }

    pub fn empty_series(column: impl Into<String>) -> Self {
        IndicatorError::EmptySeries {
            column: column.into(),
        }
    }

    pub fn invalid_parameter(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        IndicatorError::InvalidParameter {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Name of the missing column, if this is a missing-column error.
    pub fn column_name(&self) -> Option<&str> {
        match self {
            IndicatorError::MissingColumn { column } | IndicatorError::EmptySeries { column } => {
                Some(column)
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, IndicatorError>;
