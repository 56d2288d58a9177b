//! Causal window primitives shared by the indicators.
//!
//! Every helper returns a vector the same length as its input. A trailing
//! window that is not yet full, or that contains NaN, yields NaN.

use std::collections::VecDeque;

/// Row-to-row change; NaN at row 0.
pub fn diff(values: &[f64]) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    for i in 1..values.len() {
        out[i] = values[i] - values[i - 1];
    }
    out
}

/// Sum over the trailing `window` rows.
pub fn rolling_sum(values: &[f64], window: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if window == 0 {
        return out;
    }

    // Running sums drift; a window of exact zeros must still sum to 0.0.
    let mut sum = 0.0;
    let mut nan_count = 0usize;
    let mut nonzero_count = 0usize;
    for i in 0..values.len() {
        let entering = values[i];
        if entering.is_nan() {
            nan_count += 1;
        } else if entering != 0.0 {
            nonzero_count += 1;
            sum += entering;
        }

        if i >= window {
            let leaving = values[i - window];
            if leaving.is_nan() {
                nan_count -= 1;
            } else if leaving != 0.0 {
                nonzero_count -= 1;
                sum -= leaving;
            }
        }

        if nonzero_count == 0 {
            sum = 0.0;
        }
        if i + 1 >= window && nan_count == 0 {
            out[i] = sum;
        }
    }
    out
}

/// Simple moving average over the trailing `window` rows.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let divisor = window as f64;
    rolling_sum(values, window)
        .into_iter()
        .map(|s| s / divisor)
        .collect()
}

/// Highest value over the trailing `window` rows.
pub fn rolling_max(values: &[f64], window: usize) -> Vec<f64> {
    rolling_extreme(values, window, |candidate, kept| candidate >= kept)
}

/// Lowest value over the trailing `window` rows.
pub fn rolling_min(values: &[f64], window: usize) -> Vec<f64> {
    rolling_extreme(values, window, |candidate, kept| candidate <= kept)
}

// Monotonic deque of indices; `dominates(a, b)` evicts b from the back.
fn rolling_extreme(values: &[f64], window: usize, dominates: fn(f64, f64) -> bool) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if window == 0 {
        return out;
    }

    let mut deque: VecDeque<usize> = VecDeque::with_capacity(window);
    let mut last_nan: Option<usize> = None;

    for i in 0..values.len() {
        let value = values[i];
        if value.is_nan() {
            last_nan = Some(i);
        } else {
            while let Some(&back) = deque.back() {
                if dominates(value, values[back]) {
                    deque.pop_back();
                } else {
                    break;
                }
            }
            deque.push_back(i);
        }

        while let Some(&front) = deque.front() {
            if front + window <= i {
                deque.pop_front();
            } else {
                break;
            }
        }

        if i + 1 < window {
            continue;
        }
        let window_has_nan = last_nan.is_some_and(|n| n + window > i);
        if !window_has_nan {
            if let Some(&front) = deque.front() {
                out[i] = values[front];
            }
        }
    }
    out
}

/// Exponential moving average with `alpha = 2 / (span + 1)`, seeded with the
/// first observation. Written as `prev + alpha * (value - prev)` so a constant
/// input reproduces itself exactly. Leading NaN rows stay NaN; a NaN after the seed carries
/// the previous average forward.
pub fn ema(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out = vec![f64::NAN; values.len()];
    let mut current: Option<f64> = None;

    for (i, &value) in values.iter().enumerate() {
        current = match (current, value.is_nan()) {
            (None, true) => None,
            (None, false) => Some(value),
            (Some(prev), true) => Some(prev),
            (Some(prev), false) => Some(prev + alpha * (value - prev)),
        };
        if let Some(v) = current {
            out[i] = v;
        }
    }
    out
}
