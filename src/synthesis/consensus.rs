use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{AgentWeights, Config, ConfidenceThresholds};
use crate::models::{AgentPanel, Direction, SignalStrength};

/// Result of fusing the three normalized opinions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Consensus {
    pub weighted: f64,
    pub agreement_bonus: f64,
    /// `clamp(weighted + agreement_bonus, 0, 1)`.
    pub confidence: f64,
    pub direction: Direction,
    pub strength: SignalStrength,
}

#[derive(Debug, Clone)]
pub struct ConfidenceSynthesizer {
    weights: AgentWeights,
    thresholds: ConfidenceThresholds,
    max_agreement_bonus: f64,
    variance_penalty: f64,
}

impl ConfidenceSynthesizer {
    pub fn new(cfg: &Config) -> Self {
        Self {
            weights: cfg.agent_weights,
            thresholds: cfg.thresholds,
            max_agreement_bonus: cfg.max_agreement_bonus,
            variance_penalty: cfg.variance_penalty,
        }
    }

    pub fn fuse(&self, panel: &AgentPanel) -> Consensus {
        let weighted: f64 = panel
            .iter()
            .map(|(kind, s)| s.confidence * self.weights.get(kind))
            .sum();
        let agreement_bonus = self.agreement_bonus(panel);
        let confidence = (weighted + agreement_bonus).clamp(0.0, 1.0);

        let direction = self.direction(panel, confidence);
        let strength = self.strength(confidence);

        debug!(
            "Fused confidence {:.4} (weighted {:.4} + bonus {:.4}) -> {} {}",
            confidence, weighted, agreement_bonus, direction, strength
        );

        Consensus {
            weighted,
            agreement_bonus,
            confidence,
            direction,
            strength,
        }
    }

    /// Rewards low spread between the three confidences. Population variance.
    pub fn agreement_bonus(&self, panel: &AgentPanel) -> f64 {
        let confs: Vec<f64> = panel.iter().map(|(_, s)| s.confidence).collect();
        let n = confs.len() as f64;
        let mean = confs.iter().sum::<f64>() / n;
        let variance = confs.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / n;
        (self.max_agreement_bonus - self.variance_penalty * variance).max(0.0)
    }

    /// Two votes plus a confidence at or above the hold threshold.
    pub fn direction(&self, panel: &AgentPanel, confidence: f64) -> Direction {
        if confidence < self.thresholds.hold {
            return Direction::Hold;
        }
        [Direction::Long, Direction::Short]
            .into_iter()
            .find(|d| panel.count(*d) >= 2)
            .unwrap_or(Direction::Hold)
    }

    pub fn strength(&self, confidence: f64) -> SignalStrength {
        if confidence >= self.thresholds.strong {
            SignalStrength::Strong
        } else if confidence >= self.thresholds.moderate {
            SignalStrength::Moderate
        } else {
            SignalStrength::Weak
        }
    }

    pub fn hold_threshold(&self) -> f64 {
        self.thresholds.hold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NormalizedSignal;

    fn sig(direction: Direction, confidence: f64) -> NormalizedSignal {
        NormalizedSignal {
            direction,
            confidence,
            factors: vec![],
            defaulted: false,
        }
    }

    fn panel(t: (Direction, f64), m: (Direction, f64), s: (Direction, f64)) -> AgentPanel {
        AgentPanel {
            technical: sig(t.0, t.1),
            macroeconomic: sig(m.0, m.1),
            sentiment: sig(s.0, s.1),
        }
    }

    fn synth() -> ConfidenceSynthesizer {
        ConfidenceSynthesizer::new(&Config::default())
    }

    #[test]
    fn unanimous_full_confidence_is_strong_long() {
        use Direction::Long;
        let c = synth().fuse(&panel((Long, 1.0), (Long, 1.0), (Long, 1.0)));
        assert_eq!(c.direction, Direction::Long);
        assert_eq!(c.strength, SignalStrength::Strong);
        assert_eq!(c.confidence, 1.0);
        assert!((c.agreement_bonus - 0.1).abs() < 1e-12);
    }

    #[test]
    fn weights_and_bonus() {
        use Direction::{Long, Short};
        // weighted = 0.32 + 0.18 + 0.21 = 0.71; mean 0.7, var = (0.01+0.01+0)/3
        let c = synth().fuse(&panel((Long, 0.8), (Long, 0.6), (Short, 0.7)));
        assert!((c.weighted - 0.71).abs() < 1e-12);
        let var = 0.02 / 3.0;
        assert!((c.agreement_bonus - (0.1 - 2.0 * var)).abs() < 1e-12);
        assert_eq!(c.direction, Direction::Long);
        assert_eq!(c.strength, SignalStrength::Strong);
    }

    #[test]
    fn large_spread_earns_no_bonus() {
        use Direction::Hold;
        let c = synth().fuse(&panel((Hold, 1.0), (Hold, 0.0), (Hold, 0.0)));
        assert_eq!(c.agreement_bonus, 0.0);
        assert!((c.confidence - 0.4).abs() < 1e-12);
    }

    #[test]
    fn split_vote_is_hold_even_when_confident() {
        use Direction::{Hold, Long, Short};
        let c = synth().fuse(&panel((Long, 0.9), (Short, 0.9), (Hold, 0.9)));
        assert!(c.confidence >= 0.65);
        assert_eq!(c.direction, Direction::Hold);
    }

    #[test]
    fn confidence_bounded_and_threshold_respected_over_grid() {
        let steps: Vec<f64> = (0..=10).map(|i| i as f64 / 10.0).collect();
        let dirs = [Direction::Long, Direction::Short, Direction::Hold];
        let s = synth();
        for &a in &steps {
            for &b in &steps {
                for &c in &steps {
                    for &da in &dirs {
                        for &db in &dirs {
                            let out = s.fuse(&panel((da, a), (db, b), (Direction::Long, c)));
                            assert!((0.0..=1.0).contains(&out.confidence));
                            if out.confidence < 0.65 {
                                assert_eq!(out.direction, Direction::Hold);
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn strength_bands() {
        let s = synth();
        assert_eq!(s.strength(0.75), SignalStrength::Strong);
        assert_eq!(s.strength(0.7), SignalStrength::Moderate);
        assert_eq!(s.strength(0.65), SignalStrength::Moderate);
        assert_eq!(s.strength(0.649), SignalStrength::Weak);
    }
}
