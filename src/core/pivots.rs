use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{CandleSeries, SwingType};

/// A confirmed swing high or low.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pivot {
    pub time: DateTime<Utc>,
    pub price: f64,
    pub swing_type: SwingType,
}

impl Pivot {
    pub fn is_high(&self) -> bool {
        self.swing_type == SwingType::High
    }
}

/// Finds swing highs/lows confirmed by `left_window` candles before and
/// `right_window` candles after.
#[derive(Debug, Clone, Copy)]
pub struct PivotDetector {
    pub left_window: usize,
    pub right_window: usize,
}

impl Default for PivotDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl PivotDetector {
    pub fn new() -> Self {
        Self::with_windows(3, 3)
    }

    pub fn with_windows(left_window: usize, right_window: usize) -> Self {
        Self {
            left_window,
            right_window,
        }
    }

    pub fn min_candles(&self) -> usize {
        self.left_window
            .saturating_add(self.right_window)
            .saturating_add(1)
    }

    /// Pivots in ascending time order. A candle that is both the highest high
    /// and the lowest low of its window yields a high pivot followed by a low
    /// pivot. Short series yield an empty list.
    pub fn detect(&self, candles: &CandleSeries) -> Vec<Pivot> {
        let mut pivots = Vec::new();
        let len = candles.len();
        if len < self.min_candles() {
            return pivots;
        }

        let bars = candles.as_slice();
        for i in self.left_window..(len - self.right_window) {
            let window = (i - self.left_window)..=(i + self.right_window);
            let current = &bars[i];

            // Ties with neighbours still qualify.
            let is_swing_high = window
                .clone()
                .filter(|&j| j != i)
                .all(|j| bars[j].high <= current.high);
            let is_swing_low = window
                .filter(|&j| j != i)
                .all(|j| bars[j].low >= current.low);

            if is_swing_high {
                pivots.push(Pivot {
                    time: current.timestamp,
                    price: current.high,
                    swing_type: SwingType::High,
                });
            }
            if is_swing_low {
                pivots.push(Pivot {
                    time: current.timestamp,
                    price: current.low,
                    swing_type: SwingType::Low,
                });
            }
        }

        pivots
    }
}
