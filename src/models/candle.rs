use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SynthesisError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    #[serde(alias = "time")]
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

impl Candle {
    pub fn is_finite(&self) -> bool {
        self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
            && self.volume.is_finite()
    }
}

/// Time-ordered OHLC series, oldest first.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct CandleSeries {
    candles: Vec<Candle>,
}

impl CandleSeries {
    pub fn new(candles: Vec<Candle>) -> Self {
        Self { candles }
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    pub fn tail(&self, n: usize) -> CandleSeries {
        let start = self.candles.len().saturating_sub(n);
        CandleSeries::new(self.candles[start..].to_vec())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candle> {
        self.candles.iter()
    }

    pub fn as_slice(&self) -> &[Candle] {
        &self.candles
    }

    pub fn highs_max(&self) -> f64 {
        self.candles
            .iter()
            .map(|c| c.high)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn lows_min(&self) -> f64 {
        self.candles
            .iter()
            .map(|c| c.low)
            .fold(f64::INFINITY, f64::min)
    }

    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    /// Mean volume of the last `window` candles, `None` for an empty series.
    pub fn average_volume(&self, window: usize) -> Option<f64> {
        let recent = self.tail(window);
        if recent.is_empty() {
            return None;
        }
        Some(recent.iter().map(|c| c.volume).sum::<f64>() / recent.len() as f64)
    }

    /// Rejects non-finite prices and timestamps that go backwards.
    /// Equal timestamps are tolerated.
    pub fn validate(&self) -> Result<(), SynthesisError> {
        for (index, candle) in self.candles.iter().enumerate() {
            if !candle.is_finite() {
                return Err(SynthesisError::InvalidSeries {
                    index,
                    reason: "non-finite OHLCV value",
                });
            }
            if index > 0 && candle.timestamp < self.candles[index - 1].timestamp {
                return Err(SynthesisError::InvalidSeries {
                    index,
                    reason: "timestamp earlier than previous candle",
                });
            }
        }
        Ok(())
    }

    pub fn push(&mut self, candle: Candle) {
        self.candles.push(candle);
    }
}

impl std::ops::Index<usize> for CandleSeries {
    type Output = Candle;
    fn index(&self, index: usize) -> &Self::Output {
        &self.candles[index]
    }
}

impl From<Vec<Candle>> for CandleSeries {
    fn from(candles: Vec<Candle>) -> Self {
        Self::new(candles)
    }
}

impl<'a> IntoIterator for &'a CandleSeries {
    type Item = &'a Candle;
    type IntoIter = std::slice::Iter<'a, Candle>;
    fn into_iter(self) -> Self::IntoIter {
        self.candles.iter()
    }
}
