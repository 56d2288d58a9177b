//! Shared signal types.

use serde::{Deserialize, Serialize};

/// Discrete trading decision for one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Signal {
    Sell,
    Hold,
    Buy,
}

impl Signal {
    /// Directional value: -1, 0, +1
    pub fn as_i32(&self) -> i32 {
        match self {
            Signal::Sell => -1,
            Signal::Hold => 0,
            Signal::Buy => 1,
        }
    }

    /// Inverse of [`Signal::as_i32`] for a stored direction column; NaN holds.
    pub fn from_direction(direction: f64) -> Self {
        if direction > 0.0 {
            Signal::Buy
        } else if direction < 0.0 {
            Signal::Sell
        } else {
            Signal::Hold
        }
    }

    pub fn is_actionable(&self) -> bool {
        *self != Signal::Hold
    }
}

/// Per-row signal plus a non-negative strength score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalRecord {
    pub signal: Signal,
    pub strength: f64,
}

impl SignalRecord {
    pub fn hold() -> Self {
        Self {
            signal: Signal::Hold,
            strength: 0.0,
        }
    }

    pub fn new(signal: Signal, strength: f64) -> Self {
        Self {
            signal,
            strength: strength.max(0.0),
        }
    }
}
