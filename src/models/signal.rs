use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::config::AgentWeights;
use crate::error::FailureClass;
use crate::models::{AgentKind, Direction, PatternType, RiskLevel, SignalStrength};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TradeLevels {
    pub entry: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub risk_reward: f64,
}

impl TradeLevels {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn is_zero(&self) -> bool {
        self.entry == 0.0 && self.stop_loss == 0.0 && self.take_profit == 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub market_risk: RiskLevel,
    pub volatility_risk: RiskLevel,
    pub liquidity_risk: RiskLevel,
}

impl RiskAssessment {
    pub fn all_high() -> Self {
        Self {
            market_risk: RiskLevel::High,
            volatility_risk: RiskLevel::High,
            liquidity_risk: RiskLevel::High,
        }
    }
}

/// Risk tiers before validation; a tier is `None` when its input was unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PartialRiskAssessment {
    pub market_risk: Option<RiskLevel>,
    pub volatility_risk: Option<RiskLevel>,
    pub liquidity_risk: Option<RiskLevel>,
}

impl PartialRiskAssessment {
    pub fn present(&self) -> usize {
        [self.market_risk, self.volatility_risk, self.liquidity_risk]
            .iter()
            .filter(|r| r.is_some())
            .count()
    }

    /// Missing tiers are treated as HIGH.
    pub fn or_high(&self) -> RiskAssessment {
        RiskAssessment {
            market_risk: self.market_risk.unwrap_or(RiskLevel::High),
            volatility_risk: self.volatility_risk.unwrap_or(RiskLevel::High),
            liquidity_risk: self.liquidity_risk.unwrap_or(RiskLevel::High),
        }
    }
}

impl From<RiskAssessment> for PartialRiskAssessment {
    fn from(r: RiskAssessment) -> Self {
        Self {
            market_risk: Some(r.market_risk),
            volatility_risk: Some(r.volatility_risk),
            liquidity_risk: Some(r.liquidity_risk),
        }
    }
}

/// Why a signal carries less information than a full decision would.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Degradation {
    InsufficientHistory { candles: usize, required: usize },
    NoPattern,
    PatternDisagrees { pattern: PatternType, direction: Direction },
    InvalidQuotes,
    MalformedAgentInput { agent: AgentKind },
    MissingRiskInput { field: String },
    NonFiniteOutput { field: String },
    SynthesisFailed { class: FailureClass, detail: String },
}

impl fmt::Display for Degradation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Degradation::InsufficientHistory { candles, required } => write!(
                f,
                "only {} candles, pivot detection needs {}",
                candles, required
            ),
            Degradation::NoPattern => write!(f, "no AB-CD pattern on the latest pivots"),
            Degradation::PatternDisagrees { pattern, direction } => write!(
                f,
                "{} AB-CD pattern contradicts {} consensus",
                pattern, direction
            ),
            Degradation::InvalidQuotes => write!(f, "ask/bid quotes are not positive"),
            Degradation::MalformedAgentInput { agent } => {
                write!(f, "{} agent input was incomplete", agent)
            }
            Degradation::MissingRiskInput { field } => write!(f, "risk input {} unusable", field),
            Degradation::NonFiniteOutput { field } => {
                write!(f, "non-finite {} replaced with 0", field)
            }
            Degradation::SynthesisFailed { class, detail } => {
                write!(f, "synthesis failed ({}): {}", class, detail)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    pub data_completeness: f64,
    pub agent_agreement: f64,
    pub confidence_alignment: f64,
    pub risk_assessment_completeness: f64,
    pub overall_quality: f64,
    pub degradations: Vec<Degradation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewWindow {
    #[serde(rename = "Next market session")]
    NextSession,
    #[serde(rename = "Within 4 hours")]
    WithinFourHours,
    #[serde(rename = "Within 1 hour")]
    WithinOneHour,
    #[serde(rename = "Immediate")]
    Immediate,
}

impl ReviewWindow {
    pub fn for_strength(strength: SignalStrength) -> Self {
        match strength {
            SignalStrength::Strong => ReviewWindow::NextSession,
            SignalStrength::Moderate => ReviewWindow::WithinFourHours,
            SignalStrength::Weak => ReviewWindow::WithinOneHour,
        }
    }
}

impl fmt::Display for ReviewWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewWindow::NextSession => write!(f, "Next market session"),
            ReviewWindow::WithinFourHours => write!(f, "Within 4 hours"),
            ReviewWindow::WithinOneHour => write!(f, "Within 1 hour"),
            ReviewWindow::Immediate => write!(f, "Immediate"),
        }
    }
}

/// The final, validated decision record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesizedSignal {
    pub signal_id: String,
    pub asset: String,
    pub generated_at: DateTime<Utc>,
    pub direction: Direction,
    pub confidence: f64,
    pub entry_target: f64,
    pub stop_loss_target: f64,
    pub take_profit_target: f64,
    pub risk_reward_ratio: f64,
    pub signal_strength: SignalStrength,
    pub agent_consensus: BTreeMap<AgentKind, Direction>,
    pub confirming_factors: Vec<String>,
    pub conflicting_factors: Vec<String>,
    pub risk_assessment: RiskAssessment,
    pub reasoning: String,
    pub recommendations: Vec<String>,
    pub next_review_time: ReviewWindow,
    pub threshold_used: f64,
    pub agent_weights: AgentWeights,
    pub quality_metrics: QualityMetrics,
}

impl SynthesizedSignal {
    pub fn levels(&self) -> TradeLevels {
        TradeLevels {
            entry: self.entry_target,
            stop_loss: self.stop_loss_target,
            take_profit: self.take_profit_target,
            risk_reward: self.risk_reward_ratio,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.quality_metrics
            .degradations
            .iter()
            .any(|d| matches!(d, Degradation::SynthesisFailed { .. }))
    }
}

pub fn signal_id(asset: &str, at: DateTime<Utc>) -> String {
    format!("signal_{}_{}", asset, at.format("%Y%m%d_%H%M%S"))
}
