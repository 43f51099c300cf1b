use crate::config::Config;
use crate::core::abcd::AbcdPattern;
use crate::models::{PatternType, Quotes, TradeLevels};

/// Extension one step beyond the one the pattern completed at; the stop sits
/// there, on the assumption that a deeper move invalidates the pattern.
pub fn next_extension(used_extension: f64) -> f64 {
    const LADDER: [(f64, f64); 5] = [
        (1.13, 1.272),
        (1.272, 1.618),
        (1.618, 2.0),
        (2.0, 2.618),
        (2.618, 2.618),
    ];
    LADDER
        .iter()
        .find(|(from, _)| (from - used_extension).abs() < 1e-9)
        .map(|(_, to)| *to)
        .unwrap_or(used_extension * 1.618)
}

pub fn risk_reward(entry: f64, stop_loss: f64, take_profit: f64) -> f64 {
    let risk = (entry - stop_loss).abs();
    if risk > 0.0 {
        (take_profit - entry).abs() / risk
    } else {
        0.0
    }
}

pub struct TradeLevelCalculator {
    pub min_point_size: f64,
    pub stop_buffer_ticks: f64,
    pub take_profit_ratio: f64,
}

impl Default for TradeLevelCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl TradeLevelCalculator {
    pub fn new() -> Self {
        Self {
            min_point_size: 0.0001,
            stop_buffer_ticks: 10.0,
            take_profit_ratio: 0.618,
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self {
            min_point_size: cfg.min_point_size,
            stop_buffer_ticks: cfg.stop_buffer_ticks,
            take_profit_ratio: cfg.take_profit_ratio,
        }
    }

    /// Long setups enter on the ask, short setups on the bid. The stop never
    /// sits on the wrong side of D.
    pub fn calculate(&self, pattern: &AbcdPattern, quotes: Quotes) -> TradeLevels {
        let next_ext = next_extension(pattern.used_extension);
        let bc_leg = pattern.bc_leg();
        let target_distance = self.take_profit_ratio * pattern.cd_range();
        let buffer = self.stop_buffer_ticks * self.min_point_size;
        let c = pattern.c.price;
        let d = pattern.d.price;

        let (entry, stop_loss, take_profit) = match pattern.pattern_type {
            PatternType::Bullish => {
                let mut stop = c - next_ext * bc_leg;
                if stop > d {
                    stop = d - buffer;
                }
                (quotes.ask, stop, d + target_distance)
            }
            PatternType::Bearish => {
                let mut stop = c + next_ext * bc_leg;
                if stop < d {
                    stop = d + buffer;
                }
                (quotes.bid, stop, d - target_distance)
            }
        };

        TradeLevels {
            entry,
            stop_loss,
            take_profit,
            risk_reward: risk_reward(entry, stop_loss, take_profit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::make_pattern;
    use crate::models::SwingType::{High, Low};

    #[test]
    fn extension_ladder() {
        assert_eq!(next_extension(1.13), 1.272);
        assert_eq!(next_extension(1.272), 1.618);
        assert_eq!(next_extension(1.618), 2.0);
        assert_eq!(next_extension(2.0), 2.618);
        assert_eq!(next_extension(2.618), 2.618);
        assert!((next_extension(3.0) - 3.0 * 1.618).abs() < 1e-12);
    }

    #[test]
    fn bullish_levels_from_reference_pattern() {
        let pattern = make_pattern(
            &[(High, 110.0), (Low, 100.0), (High, 106.18), (Low, 101.90)],
            PatternType::Bullish,
            0.618,
            1.618,
        );
        let levels = TradeLevelCalculator::new().calculate(
            &pattern,
            Quotes {
                ask: 106.50,
                bid: 106.40,
            },
        );
        assert!((levels.entry - 106.50).abs() < 1e-9);
        // 106.18 - 2.0 * 6.18, below D so unclamped
        assert!((levels.stop_loss - 93.82).abs() < 1e-9);
        // 101.90 + 0.618 * 4.28
        assert!((levels.take_profit - 104.54504).abs() < 1e-9);
        let expected_rr = (104.54504f64 - 106.50).abs() / (106.50f64 - 93.82).abs();
        assert!((levels.risk_reward - expected_rr).abs() < 1e-9);
    }

    #[test]
    fn bullish_stop_clamps_below_d() {
        // next extension 1.272 * bc 1.0 from C=101 => 99.728, above D=99.5
        let pattern = make_pattern(
            &[(High, 102.0), (Low, 100.0), (High, 101.0), (Low, 99.5)],
            PatternType::Bullish,
            0.5,
            1.13,
        );
        let quotes = Quotes {
            ask: 99.6,
            bid: 99.5,
        };
        let levels = TradeLevelCalculator::new().calculate(&pattern, quotes);
        assert!((levels.stop_loss - (99.5 - 0.001)).abs() < 1e-9);
        assert!(levels.stop_loss < pattern.d.price);
    }

    #[test]
    fn bearish_levels_mirror() {
        let pattern = make_pattern(
            &[(Low, 100.0), (High, 110.0), (Low, 103.82), (High, 113.82)],
            PatternType::Bearish,
            0.618,
            1.618,
        );
        let levels = TradeLevelCalculator::new().calculate(
            &pattern,
            Quotes {
                ask: 113.90,
                bid: 113.80,
            },
        );
        assert!((levels.entry - 113.80).abs() < 1e-9);
        assert!((levels.stop_loss - (103.82 + 2.0 * 6.18)).abs() < 1e-9);
        assert!((levels.take_profit - (113.82 - 0.618 * 10.0)).abs() < 1e-9);
        assert!(levels.stop_loss > pattern.d.price);
    }

    #[test]
    fn bearish_stop_clamps_above_d() {
        let pattern = make_pattern(
            &[(Low, 100.0), (High, 102.0), (Low, 101.0), (High, 102.5)],
            PatternType::Bearish,
            0.5,
            1.13,
        );
        let quotes = Quotes {
            ask: 102.5,
            bid: 102.4,
        };
        let levels = TradeLevelCalculator::new().calculate(&pattern, quotes);
        assert!((levels.stop_loss - (102.5 + 0.001)).abs() < 1e-9);
    }

    #[test]
    fn zero_risk_gives_zero_ratio() {
        assert_eq!(risk_reward(100.0, 100.0, 110.0), 0.0);
        assert!((risk_reward(100.0, 95.0, 110.0) - 2.0).abs() < 1e-12);
    }
}
