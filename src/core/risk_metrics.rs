use serde::{Deserialize, Serialize};

use crate::core::stat_levels::quantile;
use crate::models::CandleSeries;

const TRADING_DAYS: f64 = 252.0;
const SECONDS_PER_DAY: f64 = 86_400.0;
const RISK_FREE_RATE: f64 = 0.02;

/// Realized risk statistics from close-to-close returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// Bars per year implied by the candle spacing.
    pub periods_per_year: f64,
    pub annualized_volatility: f64,
    pub sharpe_ratio: f64,
    /// Most negative peak-to-trough move of the compounded curve, <= 0.
    pub max_drawdown: f64,
    /// 5% quantile of per-bar returns.
    pub value_at_risk_95: f64,
}

impl RiskMetrics {
    /// `None` when fewer than two returns are available.
    pub fn calculate(candles: &CandleSeries) -> Option<Self> {
        let returns = simple_returns(&candles.closes());
        if returns.len() < 2 {
            return None;
        }

        let periods_per_year = periods_per_year(candles);
        let n = returns.len() as f64;
        let mean = returns.iter().sum::<f64>() / n;
        let std = (returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt();

        let period_rf = RISK_FREE_RATE / periods_per_year;
        let sharpe_ratio = if std > 0.0 {
            (mean - period_rf) / std * periods_per_year.sqrt()
        } else {
            0.0
        };

        let mut equity = 1.0;
        let mut peak = 1.0;
        let mut max_drawdown: f64 = 0.0;
        for r in &returns {
            equity *= 1.0 + r;
            peak = f64::max(peak, equity);
            max_drawdown = max_drawdown.min((equity - peak) / peak);
        }

        let mut sorted = returns.clone();
        sorted.sort_by(f64::total_cmp);

        Some(Self {
            periods_per_year,
            annualized_volatility: std * periods_per_year.sqrt(),
            sharpe_ratio,
            max_drawdown,
            value_at_risk_95: quantile(&sorted, 0.05),
        })
    }
}

/// A year of 252 trading days divided by the median spacing between
/// candles: daily bars give 252, hourly bars 6048. Daily when the series
/// has no positive spacing.
pub fn periods_per_year(candles: &CandleSeries) -> f64 {
    let mut gaps: Vec<i64> = candles
        .as_slice()
        .windows(2)
        .map(|w| (w[1].timestamp - w[0].timestamp).num_seconds())
        .filter(|secs| *secs > 0)
        .collect();
    if gaps.is_empty() {
        return TRADING_DAYS;
    }
    gaps.sort_unstable();
    let median = gaps[gaps.len() / 2] as f64;
    TRADING_DAYS * SECONDS_PER_DAY / median
}

/// Percentage changes, skipping steps from a zero price.
fn simple_returns(closes: &[f64]) -> Vec<f64> {
    closes
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| w[1] / w[0] - 1.0)
        .collect()
}
