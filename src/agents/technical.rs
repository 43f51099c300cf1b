use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::core::{AbcdMatcher, AbcdPattern, Pivot, PivotDetector, StatLevels, TradeLevelCalculator};
use crate::models::{AgentSignal, CandleSeries, PatternType, Quotes, TradeLevels};

const RECENT_PIVOTS: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicalReport {
    pub total_pivots: usize,
    pub recent_pivots: Vec<Pivot>,
    pub pattern: Option<AbcdPattern>,
    /// Present only when a pattern matched and the quotes were usable.
    pub trade_levels: Option<TradeLevels>,
    pub stat_levels: Option<StatLevels>,
    /// Technical opinion in the raw agent format, ready for normalization.
    pub signal: AgentSignal,
}

/// Chart-side analysis: pivots, AB-CD pattern, levels, and the technical
/// sub-signal derived from them.
pub struct TechnicalAnalyzer {
    detector: PivotDetector,
    matcher: AbcdMatcher,
    calculator: TradeLevelCalculator,
    pattern_confidence: f64,
    neutral_confidence: f64,
    levels_lookback: usize,
}

impl TechnicalAnalyzer {
    pub fn new(cfg: &Config) -> Self {
        Self {
            detector: PivotDetector::with_windows(cfg.pivot_left_window, cfg.pivot_right_window),
            matcher: AbcdMatcher::from_config(cfg),
            calculator: TradeLevelCalculator::from_config(cfg),
            pattern_confidence: cfg.pattern_confidence,
            neutral_confidence: cfg.neutral_confidence,
            levels_lookback: cfg.levels_lookback,
        }
    }

    pub fn analyze(&self, candles: &CandleSeries, quotes: Quotes) -> TechnicalReport {
        let pivots = self.detector.detect(candles);
        let pattern = self.matcher.find(&pivots);
        debug!(
            "Technical scan: {} candles, {} pivots, pattern: {}",
            candles.len(),
            pivots.len(),
            pattern
                .map(|p| p.pattern_type.to_string())
                .unwrap_or_else(|| "none".to_string())
        );

        let trade_levels = match pattern {
            Some(p) if quotes.is_usable() => Some(self.calculator.calculate(&p, quotes)),
            _ => None,
        };

        let signal = match pattern {
            Some(p) => {
                let label = match p.pattern_type {
                    PatternType::Bullish => "BUY",
                    PatternType::Bearish => "SELL",
                };
                AgentSignal::new(label, self.pattern_confidence).with_factors([
                    format!("{} AB-CD pattern", p.pattern_type),
                    format!(
                        "Fibonacci {} retracement / {} extension",
                        p.used_retracement, p.used_extension
                    ),
                ])
            }
            None => AgentSignal::new("HOLD", self.neutral_confidence),
        };

        let start = pivots.len().saturating_sub(RECENT_PIVOTS);
        TechnicalReport {
            total_pivots: pivots.len(),
            recent_pivots: pivots[start..].to_vec(),
            pattern,
            trade_levels,
            stat_levels: StatLevels::calculate(candles, self.levels_lookback),
            signal,
        }
    }
}
