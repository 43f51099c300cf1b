use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SynthesisError;

/// Point-in-time market snapshot supplied by the data collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketContext {
    /// Snapshot time. Stamped on the output in place of the wall clock.
    pub timestamp: DateTime<Utc>,
    pub current_price: f64,
    /// Falls back to `current_price` when absent.
    #[serde(default)]
    pub current_ask: Option<f64>,
    #[serde(default)]
    pub current_bid: Option<f64>,
    #[serde(default)]
    pub volume: f64,
    /// Falls back to the series' recent average volume when absent.
    #[serde(default)]
    pub avg_volume_30d: Option<f64>,
    /// Annualized volatility as a fraction. Falls back to the series'
    /// realized volatility when absent.
    #[serde(default)]
    pub volatility: Option<f64>,
}

impl MarketContext {
    pub fn new(timestamp: DateTime<Utc>, current_price: f64) -> Self {
        Self {
            timestamp,
            current_price,
            current_ask: None,
            current_bid: None,
            volume: 0.0,
            avg_volume_30d: None,
            volatility: None,
        }
    }

    pub fn quotes(&self) -> Quotes {
        Quotes {
            ask: self.current_ask.unwrap_or(self.current_price),
            bid: self.current_bid.unwrap_or(self.current_price),
        }
    }

    pub fn validate(&self) -> Result<(), SynthesisError> {
        let fields = [
            ("current_price", Some(self.current_price)),
            ("current_ask", self.current_ask),
            ("current_bid", self.current_bid),
            ("volume", Some(self.volume)),
            ("avg_volume_30d", self.avg_volume_30d),
            ("volatility", self.volatility),
        ];
        for (field, value) in fields {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(SynthesisError::NonFiniteInput { field });
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quotes {
    pub ask: f64,
    pub bid: f64,
}

impl Quotes {
    pub fn is_usable(&self) -> bool {
        self.ask.is_finite() && self.bid.is_finite() && self.ask > 0.0 && self.bid > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-01-15T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn quotes_fall_back_to_current_price() {
        let mut m = MarketContext::new(ts(), 450.0);
        assert_eq!(m.quotes(), Quotes { ask: 450.0, bid: 450.0 });
        m.current_ask = Some(450.05);
        assert!((m.quotes().ask - 450.05).abs() < 1e-12);
        assert!((m.quotes().bid - 450.0).abs() < 1e-12);
    }

    #[test]
    fn validate_names_the_bad_field() {
        let mut m = MarketContext::new(ts(), 450.0);
        assert!(m.validate().is_ok());
        m.volatility = Some(f64::INFINITY);
        match m.validate() {
            Err(SynthesisError::NonFiniteInput { field }) => assert_eq!(field, "volatility"),
            other => panic!("expected NonFiniteInput, got {:?}", other),
        }
    }

    #[test]
    fn zero_quotes_are_unusable() {
        assert!(!Quotes { ask: 0.0, bid: 1.0 }.is_usable());
        assert!(Quotes { ask: 1.1, bid: 1.0 }.is_usable());
    }
}
