// =============================================================================
// Money Flow Index (MFI)
// =============================================================================
//
// typical  = (high + low + close) / 3
// raw flow = typical * volume
// A row's raw flow counts as positive when it exceeds the previous row's,
// negative when it falls below it; an unchanged flow counts toward neither.
// MFI      = 100 - 100 / (1 + sum(positive) / sum(negative)) over `period` rows
//
// A window without negative flow saturates to 100.
// =============================================================================

use super::Indicator;
use super::rolling::rolling_sum;
use super::rsi::rsi_from_averages;
use crate::config::MfiParams;
use crate::error::Result;
use crate::table::{ColumnMap, Field, PriceTable};
use crate::validate::require_same_length;
use log::debug;
use polars::prelude::*;

pub const MFI_COLUMN: &str = "MFI";

/// Typical price times volume for each row.
pub fn raw_money_flow(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    volume: &[f64],
) -> Result<Vec<f64>> {
    require_same_length(&[
        ("close", close),
        ("high", high),
        ("low", low),
        ("volume", volume),
    ])?;
    Ok((0..close.len())
        .map(|i| (high[i] + low[i] + close[i]) / 3.0 * volume[i])
        .collect())
}

pub fn money_flow_index(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    volume: &[f64],
    period: usize,
) -> Result<Vec<f64>> {
    let flow = raw_money_flow(high, low, close, volume)?;
    let n = flow.len();

    let mut positive = vec![f64::NAN; n];
    let mut negative = vec![f64::NAN; n];
    for i in 1..n {
        let (current, previous) = (flow[i], flow[i - 1]);
        if current.is_nan() || previous.is_nan() {
            continue;
        }
        positive[i] = if current > previous { current } else { 0.0 };
        negative[i] = if current < previous { current } else { 0.0 };
    }

    let positive_sum = rolling_sum(&positive, period);
    let negative_sum = rolling_sum(&negative, period);

    // Same saturation rule as RSI: a zero denominator reads 100.
    Ok(positive_sum
        .iter()
        .zip(&negative_sum)
        .map(|(&p, &m)| rsi_from_averages(p, m))
        .collect())
}

impl Indicator for MfiParams {
    fn name(&self) -> &'static str {
        "MFI"
    }

    fn output_column(&self) -> &str {
        MFI_COLUMN
    }

    fn required_columns(&self, columns: &ColumnMap) -> Vec<String> {
        vec![
            columns.column(Field::High).to_string(),
            columns.column(Field::Low).to_string(),
            self.column.clone(),
            columns.column(Field::Volume).to_string(),
        ]
    }

    fn validate_params(&self) -> Result<()> {
        self.validate()
    }

    fn compute(&self, table: &PriceTable) -> Result<Series> {
        let high = table.field(Field::High)?;
        let low = table.field(Field::Low)?;
        let close = table.values(&self.column)?;
        let volume = table.field(Field::Volume)?;
        debug!(
            "MFI over {} ({} rows, period {})",
            self.column,
            close.len(),
            self.period
        );
        Ok(Series::new(
            self.output_column().into(),
            money_flow_index(&high, &low, &close, &volume, self.period)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_money_flow() {
        let flow = raw_money_flow(&[12.0], &[9.0], &[12.0], &[100.0]).unwrap();
        assert_eq!(flow, vec![1100.0]);
    }

    #[test]
    fn test_mfi_warmup_and_known_value() {
        // flows: 100, 200 (+), 150 (-), 150 (tie), 300 (+)
        let close = [100.0, 200.0, 150.0, 150.0, 300.0];
        let volume = [1.0; 5];
        let out = money_flow_index(&close, &close, &close, &volume, 3).unwrap();
        assert!(out[..3].iter().all(|v| v.is_nan()));
        // rows 1..=3: positive 200, negative 150 => ratio 4/3
        let expected = 100.0 - 100.0 / (1.0 + 200.0 / 150.0);
        assert!((out[3] - expected).abs() < 1e-9);
        // rows 2..=4: positive 300, negative 150 => ratio 2
        assert!((out[4] - (100.0 - 100.0 / 3.0)).abs() < 1e-9);
    }

    #[test]
    fn test_mfi_no_negative_flow_saturates() {
        let close: Vec<f64> = (1..=20).map(|x| x as f64).collect();
        let volume = vec![10.0; 20];
        let out = money_flow_index(&close, &close, &close, &volume, 14).unwrap();
        assert!(out[14..].iter().all(|&v| v == 100.0));
    }

    #[test]
    fn test_mfi_ties_counted_in_neither_bucket() {
        // Only ties and one rise => no negative flow => 100
        let close = [10.0, 10.0, 10.0, 12.0];
        let volume = [5.0; 4];
        let out = money_flow_index(&close, &close, &close, &volume, 3).unwrap();
        assert_eq!(out[3], 100.0);
    }

    #[test]
    fn test_short_volume_rejected() {
        let close = [10.0, 11.0, 12.0];
        let err = money_flow_index(&close, &close, &close, &[1.0, 1.0], 2).unwrap_err();
        assert!(err.to_string().contains("volume"));
    }
}
