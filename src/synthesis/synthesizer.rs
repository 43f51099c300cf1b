use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::agents::{SignalNormalizer, TechnicalAnalyzer, TechnicalReport};
use crate::config::SharedConfig;
use crate::core::RiskMetrics;
use crate::error::{ConfigError, SynthesisError};
use crate::models::{
    AgentKind, AgentPanel, AgentSignal, CandleSeries, Degradation, Direction, MarketContext,
    NormalizedSignal, QualityMetrics, ReviewWindow, RiskAssessment, SignalStrength,
    SynthesizedSignal, TradeLevels,
};
use crate::synthesis::consensus::{Consensus, ConfidenceSynthesizer};
use crate::synthesis::narrative;
use crate::synthesis::risk::{RiskAssessor, RiskInputs};
use crate::synthesis::validation::{DraftSignal, ValidationGate};

/// One snapshot of everything the core needs for a decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisRequest {
    pub asset: String,
    pub candles: CandleSeries,
    /// Derived from `candles` when absent.
    #[serde(default)]
    pub technical: Option<AgentSignal>,
    #[serde(default, rename = "macro")]
    pub macroeconomic: AgentSignal,
    #[serde(default)]
    pub sentiment: AgentSignal,
    pub market: MarketContext,
}

/// Public entry point. Holds only read-only configuration, so one instance
/// can serve any number of concurrent calls.
pub struct SignalSynthesizer {
    config: SharedConfig,
    normalizer: SignalNormalizer,
    analyzer: TechnicalAnalyzer,
    consensus: ConfidenceSynthesizer,
    risk: RiskAssessor,
    gate: ValidationGate,
}

impl SignalSynthesizer {
    pub fn new(config: SharedConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            normalizer: SignalNormalizer::new(),
            analyzer: TechnicalAnalyzer::new(&config),
            consensus: ConfidenceSynthesizer::new(&config),
            risk: RiskAssessor::new(&config),
            gate: ValidationGate::new(&config),
            config,
        })
    }

    /// Never fails: internal errors come back as a degraded HOLD signal.
    pub fn synthesize(&self, req: &SynthesisRequest) -> SynthesizedSignal {
        match self.try_synthesize(req) {
            Ok(signal) => signal,
            Err(e) => {
                warn!("Signal synthesis for {} failed: {}", req.asset, e);
                self.degraded(req, &e)
            }
        }
    }

    pub fn try_synthesize(
        &self,
        req: &SynthesisRequest,
    ) -> Result<SynthesizedSignal, SynthesisError> {
        req.candles.validate()?;
        req.market.validate()?;

        let mut degradations = Vec::new();
        let quotes = req.market.quotes();

        let required = self.config.min_pivot_candles();
        if req.candles.len() < required {
            degradations.push(Degradation::InsufficientHistory {
                candles: req.candles.len(),
                required,
            });
        }

        let report = self.analyzer.analyze(&req.candles, quotes);
        if report.pattern.is_none() && req.candles.len() >= required {
            degradations.push(Degradation::NoPattern);
        }

        let technical_raw = req.technical.as_ref().unwrap_or(&report.signal);
        let panel = AgentPanel {
            technical: self.normalize(AgentKind::Technical, technical_raw, &mut degradations),
            macroeconomic: self.normalize(AgentKind::Macro, &req.macroeconomic, &mut degradations),
            sentiment: self.normalize(AgentKind::Sentiment, &req.sentiment, &mut degradations),
        };

        let consensus = self.consensus.fuse(&panel);

        let risk = self.risk.assess(self.risk_inputs(req));
        if risk.volatility_risk.is_none() {
            degradations.push(Degradation::MissingRiskInput {
                field: "volatility".to_string(),
            });
        }
        if risk.liquidity_risk.is_none() {
            degradations.push(Degradation::MissingRiskInput {
                field: "volume".to_string(),
            });
        }

        let levels = trade_levels(&consensus, &report, &mut degradations);
        let (direction, strength) = match levels {
            Some(_) => (consensus.direction, consensus.strength),
            None if consensus.direction.is_actionable() => {
                debug!(
                    "{} consensus for {} has no trade levels, holding",
                    consensus.direction, req.asset
                );
                (Direction::Hold, SignalStrength::Weak)
            }
            None => (consensus.direction, consensus.strength),
        };

        let reasoning = narrative::reasoning(
            &panel,
            direction,
            consensus.confidence,
            self.consensus.hold_threshold(),
            &degradations,
        );
        let draft = DraftSignal {
            asset: req.asset.clone(),
            generated_at: req.market.timestamp,
            direction,
            confidence: consensus.confidence,
            strength,
            levels: levels.unwrap_or_else(TradeLevels::zero),
            agent_consensus: panel.iter().map(|(k, s)| (k, s.direction)).collect(),
            confirming_factors: narrative::confirming_factors(&panel),
            conflicting_factors: narrative::conflicting_factors(&panel, &degradations),
            risk,
            reasoning: Some(reasoning),
            recommendations: narrative::recommendations(direction, strength, &risk.or_high()),
            review: ReviewWindow::for_strength(strength),
            degradations,
        };

        let signal = self.gate.validate(draft);
        info!(
            "{} {} {} @ {:.2} (entry {}, stop {}, target {}, rr {})",
            signal.signal_id,
            signal.direction,
            signal.signal_strength,
            signal.confidence,
            signal.entry_target,
            signal.stop_loss_target,
            signal.take_profit_target,
            signal.risk_reward_ratio
        );
        Ok(signal)
    }

    /// HOLD at zero confidence with every risk tier HIGH.
    pub fn degraded(&self, req: &SynthesisRequest, err: &SynthesisError) -> SynthesizedSignal {
        let at = req.market.timestamp;
        let agent_consensus: BTreeMap<AgentKind, Direction> = AgentKind::ALL
            .into_iter()
            .map(|k| (k, Direction::Hold))
            .collect();

        SynthesizedSignal {
            signal_id: format!("error_{}_{}", req.asset, at.format("%Y%m%d_%H%M%S")),
            asset: req.asset.clone(),
            generated_at: at,
            direction: Direction::Hold,
            confidence: 0.0,
            entry_target: 0.0,
            stop_loss_target: 0.0,
            take_profit_target: 0.0,
            risk_reward_ratio: 0.0,
            signal_strength: SignalStrength::Weak,
            agent_consensus,
            confirming_factors: vec!["Analysis failed".to_string()],
            conflicting_factors: Vec::new(),
            risk_assessment: RiskAssessment::all_high(),
            reasoning: format!("Signal synthesis failed: {}", err),
            recommendations: vec!["Manual analysis recommended".to_string()],
            next_review_time: ReviewWindow::Immediate,
            threshold_used: self.config.thresholds.hold,
            agent_weights: self.config.agent_weights,
            quality_metrics: QualityMetrics {
                data_completeness: 0.0,
                agent_agreement: 0.0,
                confidence_alignment: 0.0,
                risk_assessment_completeness: 0.0,
                overall_quality: 0.0,
                degradations: vec![Degradation::SynthesisFailed {
                    class: err.class(),
                    detail: err.to_string(),
                }],
            },
        }
    }

    fn normalize(
        &self,
        kind: AgentKind,
        raw: &AgentSignal,
        degradations: &mut Vec<Degradation>,
    ) -> NormalizedSignal {
        let normalized = self.normalizer.normalize(raw);
        if normalized.defaulted {
            debug!("{} agent input incomplete: {:?}", kind, raw);
            degradations.push(Degradation::MalformedAgentInput { agent: kind });
        }
        normalized
    }

    fn risk_inputs(&self, req: &SynthesisRequest) -> RiskInputs {
        let volatility = req
            .market
            .volatility
            .or_else(|| RiskMetrics::calculate(&req.candles).map(|m| m.annualized_volatility));
        let avg_volume = req
            .market
            .avg_volume_30d
            .or_else(|| req.candles.average_volume(self.config.avg_volume_window));
        RiskInputs {
            volatility,
            volume: req.market.volume,
            avg_volume,
        }
    }
}

/// Levels for an actionable direction backed by a pattern of the same bias
/// and usable quotes. `None` otherwise, with the reason recorded when there
/// was a direction to back.
fn trade_levels(
    consensus: &Consensus,
    report: &TechnicalReport,
    degradations: &mut Vec<Degradation>,
) -> Option<TradeLevels> {
    if !consensus.direction.is_actionable() {
        return None;
    }
    let pattern = report.pattern?;
    if pattern.pattern_type.to_direction() != consensus.direction {
        degradations.push(Degradation::PatternDisagrees {
            pattern: pattern.pattern_type,
            direction: consensus.direction,
        });
        return None;
    }
    if report.trade_levels.is_none() {
        degradations.push(Degradation::InvalidQuotes);
    }
    report.trade_levels
}
