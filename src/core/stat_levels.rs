use serde::{Deserialize, Serialize};

use crate::models::CandleSeries;

/// Classic floor-trader pivots plus distribution levels of recent closes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatLevels {
    pub pivot: f64,
    pub r1: f64,
    pub r2: f64,
    pub s1: f64,
    pub s2: f64,
    pub median: f64,
    pub q25: f64,
    pub q75: f64,
    pub sma_20: f64,
    pub sma_50: f64,
    pub high: f64,
    pub low: f64,
}

impl StatLevels {
    /// Levels over the last `lookback` candles; `None` for an empty series.
    pub fn calculate(candles: &CandleSeries, lookback: usize) -> Option<Self> {
        let recent = candles.tail(lookback);
        let close = recent.last()?.close;
        let high = recent.highs_max();
        let low = recent.lows_min();
        let range = high - low;

        let pivot = (high + low + close) / 3.0;

        let closes = recent.closes();
        let mut sorted = closes.clone();
        sorted.sort_by(f64::total_cmp);

        Some(Self {
            pivot,
            r1: 2.0 * pivot - low,
            r2: pivot + range,
            s1: 2.0 * pivot - high,
            s2: pivot - range,
            median: quantile(&sorted, 0.5),
            q25: quantile(&sorted, 0.25),
            q75: quantile(&sorted, 0.75),
            sma_20: trailing_mean(&closes, 20).unwrap_or(close),
            sma_50: trailing_mean(&closes, 50).unwrap_or(close),
            high,
            low,
        })
    }
}

/// Linear-interpolated quantile of an ascending slice.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = (lo + 1).min(n - 1);
            let frac = pos - lo as f64;
            sorted[lo] + (sorted[hi] - sorted[lo]) * frac
        }
    }
}

fn trailing_mean(values: &[f64], window: usize) -> Option<f64> {
    if window == 0 || values.len() < window {
        return None;
    }
    let tail = &values[values.len() - window..];
    Some(tail.iter().sum::<f64>() / window as f64)
}
