use chrono::{DateTime, Duration, Utc};

use crate::core::{AbcdPattern, Pivot};
use crate::models::{AgentSignal, Candle, CandleSeries, MarketContext, PatternType, SwingType};

pub fn base_time() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-01-15T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

/// Create candles from (open, high, low, close) tuples with auto-incrementing 1m timestamps.
pub fn make_candles(data: &[(f64, f64, f64, f64)]) -> CandleSeries {
    let base = base_time();

    let candles: Vec<Candle> = data
        .iter()
        .enumerate()
        .map(|(i, &(o, h, l, c))| Candle {
            timestamp: base + Duration::minutes(i as i64),
            open: o,
            high: h,
            low: l,
            close: c,
            volume: 100.0,
        })
        .collect();

    CandleSeries::new(candles)
}

/// Create n rising (bullish) candles starting from `start` price.
pub fn make_bullish_trend(n: usize, start: f64) -> CandleSeries {
    let base = base_time();

    let candles: Vec<Candle> = (0..n)
        .map(|i| {
            let open = start + i as f64 * 10.0;
            let close = open + 8.0;
            Candle {
                timestamp: base + Duration::minutes(i as i64),
                open,
                high: close + 2.0,
                low: open - 1.0,
                close,
                volume: 100.0,
            }
        })
        .collect();

    CandleSeries::new(candles)
}

/// Candles one unit tall centred on each mid price.
pub fn candles_from_mids(mids: &[f64]) -> CandleSeries {
    let data: Vec<(f64, f64, f64, f64)> =
        mids.iter().map(|&m| (m, m + 0.5, m - 0.5, m)).collect();
    make_candles(&data)
}

/// Candles one unit tall around each close, `step` apart.
pub fn spaced_closes(closes: &[f64], step: Duration) -> CandleSeries {
    let base = base_time();
    let candles: Vec<Candle> = closes
        .iter()
        .enumerate()
        .map(|(i, &c)| Candle {
            timestamp: base + step * i as i32,
            open: c,
            high: c + 0.5,
            low: c - 0.5,
            close: c,
            volume: 100.0,
        })
        .collect();
    CandleSeries::new(candles)
}

/// Closes from 100 alternating up and down by `step` as a fraction.
pub fn zigzag_closes(n: usize, step: f64) -> Vec<f64> {
    let mut closes = vec![100.0];
    for i in 1..n {
        let sign = if i % 2 == 1 { 1.0 } else { -1.0 };
        closes.push(closes[i - 1] * (1.0 + sign * step));
    }
    closes
}

/// Mid prices whose 3/3 pivots end in High 110, Low 100, High 106.18, Low 96.18.
pub const BULLISH_ABCD_MIDS: [f64; 20] = [
    104.0, 105.0, 106.0, 107.0, 108.0, 109.5, 107.0, 105.0, 103.0, 100.5, 102.0, 103.5, 105.68,
    103.0, 100.0, 98.0, 96.68, 97.5, 98.5, 99.5,
];

/// Series completing a bullish 0.618 / 1.618 AB-CD.
pub fn abcd_candles() -> CandleSeries {
    candles_from_mids(&BULLISH_ABCD_MIDS)
}

/// Mirror of [`abcd_candles`]: Low 90, High 100, Low 93.82, High 103.82.
pub fn bearish_abcd_candles() -> CandleSeries {
    let mids: Vec<f64> = BULLISH_ABCD_MIDS.iter().map(|m| 200.0 - m).collect();
    candles_from_mids(&mids)
}

/// Pivots at 1m spacing.
pub fn make_pivots(points: &[(SwingType, f64)]) -> Vec<Pivot> {
    let base = base_time();
    points
        .iter()
        .enumerate()
        .map(|(i, &(swing_type, price))| Pivot {
            time: base + Duration::minutes(i as i64),
            price,
            swing_type,
        })
        .collect()
}

/// Pattern built directly from four points, bypassing the matcher.
pub fn make_pattern(
    points: &[(SwingType, f64)],
    pattern_type: PatternType,
    used_retracement: f64,
    used_extension: f64,
) -> AbcdPattern {
    let p = make_pivots(points);
    AbcdPattern {
        a: p[0],
        b: p[1],
        c: p[2],
        d: p[3],
        pattern_type,
        used_retracement,
        used_extension,
    }
}

pub fn agent(direction: &str, confidence: f64) -> AgentSignal {
    AgentSignal::new(direction, confidence)
}

/// Quiet market: low volatility, volume well above average.
pub fn calm_market(price: f64) -> MarketContext {
    MarketContext {
        timestamp: base_time() + Duration::hours(1),
        current_price: price,
        current_ask: Some(price + 0.05),
        current_bid: Some(price - 0.05),
        volume: 2_000_000.0,
        avg_volume_30d: Some(1_000_000.0),
        volatility: Some(0.10),
    }
}
