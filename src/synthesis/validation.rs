use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::debug;

use crate::config::{AgentWeights, Config};
use crate::models::signal::signal_id;
use crate::models::{
    AgentKind, Degradation, Direction, PartialRiskAssessment, QualityMetrics, ReviewWindow,
    SignalStrength, SynthesizedSignal, TradeLevels,
};
use crate::synthesis::narrative;

/// Pre-validation stage record. Risk tiers and reasoning may still be
/// missing here; the gate decides what the caller finally sees.
#[derive(Debug, Clone)]
pub struct DraftSignal {
    pub asset: String,
    pub generated_at: DateTime<Utc>,
    pub direction: Direction,
    pub confidence: f64,
    pub strength: SignalStrength,
    pub levels: TradeLevels,
    pub agent_consensus: BTreeMap<AgentKind, Direction>,
    pub confirming_factors: Vec<String>,
    pub conflicting_factors: Vec<String>,
    pub risk: PartialRiskAssessment,
    pub reasoning: Option<String>,
    pub recommendations: Vec<String>,
    pub review: ReviewWindow,
    pub degradations: Vec<Degradation>,
}

#[derive(Debug, Clone)]
pub struct ValidationGate {
    hold_threshold: f64,
    price_decimals: u32,
    weights: AgentWeights,
}

impl ValidationGate {
    pub fn new(cfg: &Config) -> Self {
        Self {
            hold_threshold: cfg.thresholds.hold,
            price_decimals: cfg.price_decimals,
            weights: cfg.agent_weights,
        }
    }

    pub fn validate(&self, draft: DraftSignal) -> SynthesizedSignal {
        let DraftSignal {
            asset,
            generated_at,
            mut direction,
            confidence,
            mut strength,
            mut levels,
            agent_consensus,
            confirming_factors,
            conflicting_factors,
            risk,
            reasoning,
            mut recommendations,
            mut review,
            mut degradations,
        } = draft;

        let reasoning = reasoning.filter(|r| !r.trim().is_empty());
        let present = [true, confidence.is_finite(), reasoning.is_some()];
        let data_completeness =
            present.iter().filter(|p| **p).count() as f64 / present.len() as f64;

        let confidence = if confidence.is_finite() {
            confidence.clamp(0.0, 1.0)
        } else {
            degradations.push(Degradation::NonFiniteOutput {
                field: "confidence".to_string(),
            });
            0.0
        };

        let full_risk = risk.or_high();
        if confidence < self.hold_threshold
            && (direction != Direction::Hold || strength != SignalStrength::Weak)
        {
            debug!(
                "Gate forcing HOLD/WEAK: confidence {:.4} below {}",
                confidence, self.hold_threshold
            );
            direction = Direction::Hold;
            strength = SignalStrength::Weak;
            recommendations = narrative::recommendations(direction, strength, &full_risk);
            review = ReviewWindow::for_strength(strength);
        }

        if direction == Direction::Hold {
            levels = TradeLevels::zero();
        }

        let decimals = self.price_decimals;
        let entry = finite_or_zero(levels.entry, "entry_target", &mut degradations);
        let stop = finite_or_zero(levels.stop_loss, "stop_loss_target", &mut degradations);
        let take = finite_or_zero(levels.take_profit, "take_profit_target", &mut degradations);
        let rr = finite_or_zero(levels.risk_reward, "risk_reward_ratio", &mut degradations);

        let mut directions = agent_consensus.values();
        let first = directions.next();
        let unanimous = directions.all(|d| Some(d) == first);
        let agent_agreement = if unanimous { 1.0 } else { 0.5 };
        let aligned = (direction == Direction::Hold) == (confidence < self.hold_threshold);
        let confidence_alignment = if aligned { 1.0 } else { 0.5 };
        let risk_assessment_completeness = risk.present() as f64 / 3.0;
        let overall_quality = (data_completeness
            + agent_agreement
            + confidence_alignment
            + risk_assessment_completeness)
            / 4.0;

        SynthesizedSignal {
            signal_id: signal_id(&asset, generated_at),
            asset,
            generated_at,
            direction,
            confidence,
            entry_target: round_to(entry, decimals),
            stop_loss_target: round_to(stop, decimals),
            take_profit_target: round_to(take, decimals),
            risk_reward_ratio: round_to(rr.max(0.0), 2),
            signal_strength: strength,
            agent_consensus,
            confirming_factors,
            conflicting_factors,
            risk_assessment: full_risk,
            reasoning: reasoning.unwrap_or_else(|| "No reasoning available.".to_string()),
            recommendations,
            next_review_time: review,
            threshold_used: self.hold_threshold,
            agent_weights: self.weights,
            quality_metrics: QualityMetrics {
                data_completeness,
                agent_agreement,
                confidence_alignment,
                risk_assessment_completeness,
                overall_quality,
                degradations,
            },
        }
    }
}

fn finite_or_zero(value: f64, field: &str, degradations: &mut Vec<Degradation>) -> f64 {
    if value.is_finite() {
        value
    } else {
        degradations.push(Degradation::NonFiniteOutput {
            field: field.to_string(),
        });
        0.0
    }
}

pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value * factor).round() / factor;
    if rounded.is_finite() {
        rounded
    } else {
        value
    }
}
