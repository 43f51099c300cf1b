use crate::config::Config;
use crate::models::{PartialRiskAssessment, RiskLevel};

/// Inputs for risk tiering, already resolved against fallbacks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskInputs {
    /// Annualized, as a fraction.
    pub volatility: Option<f64>,
    pub volume: f64,
    pub avg_volume: Option<f64>,
}

#[derive(Debug, Clone, Copy)]
pub struct RiskAssessor {
    volatility_threshold: f64,
    medium_risk_factor: f64,
    volume_threshold: f64,
}

impl RiskAssessor {
    pub fn new(cfg: &Config) -> Self {
        Self {
            volatility_threshold: cfg.volatility_threshold,
            medium_risk_factor: cfg.medium_risk_factor,
            volume_threshold: cfg.volume_threshold,
        }
    }

    /// Volatility risk mirrors market risk. A tier is left empty when its
    /// input is missing, negative or non-finite.
    pub fn assess(&self, inputs: RiskInputs) -> PartialRiskAssessment {
        let vol_tier = inputs
            .volatility
            .filter(|v| usable(*v))
            .map(|v| self.volatility_tier(v));

        let liquidity = if usable(inputs.volume) {
            match inputs.avg_volume {
                Some(avg) if usable(avg) => {
                    Some(self.liquidity_tier(volume_ratio(inputs.volume, avg)))
                }
                _ => None,
            }
        } else {
            None
        };

        PartialRiskAssessment {
            market_risk: vol_tier,
            volatility_risk: vol_tier,
            liquidity_risk: liquidity,
        }
    }

    pub fn volatility_tier(&self, volatility: f64) -> RiskLevel {
        if volatility >= self.volatility_threshold {
            RiskLevel::High
        } else if volatility >= self.volatility_threshold * self.medium_risk_factor {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn liquidity_tier(&self, ratio: f64) -> RiskLevel {
        if ratio >= self.volume_threshold {
            RiskLevel::Low
        } else if ratio >= 1.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }
}

/// 1.0 when there is no average to compare against.
pub fn volume_ratio(volume: f64, avg_volume: f64) -> f64 {
    if avg_volume == 0.0 {
        1.0
    } else {
        volume / avg_volume
    }
}

fn usable(v: f64) -> bool {
    v.is_finite() && v >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assessor() -> RiskAssessor {
        RiskAssessor::new(&Config::default())
    }

    fn inputs(volatility: f64, volume: f64, avg: f64) -> RiskInputs {
        RiskInputs {
            volatility: Some(volatility),
            volume,
            avg_volume: Some(avg),
        }
    }

    #[test]
    fn volatility_tiers() {
        let a = assessor();
        let high = a.assess(inputs(0.25, 1.0, 1.0));
        assert_eq!(high.market_risk, Some(RiskLevel::High));
        assert_eq!(high.volatility_risk, Some(RiskLevel::High));
        let low = a.assess(inputs(0.10, 1.0, 1.0));
        assert_eq!(low.market_risk, Some(RiskLevel::Low));
        assert_eq!(a.volatility_tier(0.15), RiskLevel::Medium);
        assert_eq!(a.volatility_tier(0.20), RiskLevel::High);
    }

    #[test]
    fn liquidity_tiers() {
        let a = assessor();
        assert_eq!(a.assess(inputs(0.1, 1500.0, 1000.0)).liquidity_risk, Some(RiskLevel::Low));
        assert_eq!(a.assess(inputs(0.1, 1200.0, 1000.0)).liquidity_risk, Some(RiskLevel::Medium));
        assert_eq!(a.assess(inputs(0.1, 500.0, 1000.0)).liquidity_risk, Some(RiskLevel::High));
    }

    #[test]
    fn zero_average_volume_counts_as_normal() {
        assert_eq!(volume_ratio(500.0, 0.0), 1.0);
        assert_eq!(
            assessor().assess(inputs(0.1, 500.0, 0.0)).liquidity_risk,
            Some(RiskLevel::Medium)
        );
    }

    #[test]
    fn unusable_inputs_leave_tiers_empty() {
        let r = assessor().assess(RiskInputs {
            volatility: None,
            volume: f64::NAN,
            avg_volume: Some(1.0),
        });
        assert_eq!(r.present(), 0);

        let r = assessor().assess(RiskInputs {
            volatility: Some(-0.1),
            volume: 10.0,
            avg_volume: None,
        });
        assert!(r.market_risk.is_none());
        assert!(r.liquidity_risk.is_none());
    }
}
