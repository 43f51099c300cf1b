#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use harmonic_signals::models::{AgentSignal, Candle, CandleSeries, MarketContext};
use harmonic_signals::synthesis::SynthesisRequest;

pub fn base_time() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-01-15T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

/// One-unit candles centred on each mid price, 1m apart.
pub fn candles_from_mids(mids: &[f64]) -> CandleSeries {
    let base = base_time();
    let candles: Vec<Candle> = mids
        .iter()
        .enumerate()
        .map(|(i, &m)| Candle {
            timestamp: base + Duration::minutes(i as i64),
            open: m,
            high: m + 0.5,
            low: m - 0.5,
            close: m,
            volume: 1_000.0,
        })
        .collect();
    CandleSeries::new(candles)
}

/// Ends in a bullish AB-CD: High 110, Low 100, High 106.18, Low 96.18.
pub fn bullish_abcd() -> CandleSeries {
    candles_from_mids(&[
        104.0, 105.0, 106.0, 107.0, 108.0, 109.5, 107.0, 105.0, 103.0, 100.5, 102.0, 103.5,
        105.68, 103.0, 100.0, 98.0, 96.68, 97.5, 98.5, 99.5,
    ])
}

/// Steady climb: no swing ever confirms, so no pattern.
pub fn rising_series(n: usize) -> CandleSeries {
    let mids: Vec<f64> = (0..n).map(|i| 100.0 + i as f64 * 0.25).collect();
    candles_from_mids(&mids)
}

pub fn market(price: f64) -> MarketContext {
    MarketContext {
        timestamp: base_time() + Duration::minutes(30),
        current_price: price,
        current_ask: Some(price + 0.02),
        current_bid: Some(price - 0.02),
        volume: 1_800.0,
        avg_volume_30d: Some(1_000.0),
        volatility: Some(0.12),
    }
}

pub fn request(
    candles: CandleSeries,
    macro_: AgentSignal,
    sentiment: AgentSignal,
) -> SynthesisRequest {
    let price = candles.last().map(|c| c.close).unwrap_or(100.0);
    SynthesisRequest {
        asset: "EURUSD".to_string(),
        candles,
        technical: None,
        macroeconomic: macro_,
        sentiment,
        market: market(price),
    }
}
