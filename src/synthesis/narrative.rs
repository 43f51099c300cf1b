//! Human-readable parts of a signal: factors, reasoning, recommendations.

use crate::models::{
    AgentKind, AgentPanel, Degradation, Direction, RiskAssessment, RiskLevel, SignalStrength,
};

const STRONG_SUPPORT: f64 = 0.7;

/// Factors named by at least two different agents, in first-appearance order.
pub fn confirming_factors(panel: &AgentPanel) -> Vec<String> {
    let mut confirming: Vec<String> = Vec::new();
    for (kind, signal) in panel.iter() {
        for factor in &signal.factors {
            if confirming.contains(factor) {
                continue;
            }
            let named_elsewhere = panel
                .iter()
                .any(|(other, s)| other != kind && s.factors.contains(factor));
            if named_elsewhere {
                confirming.push(factor.clone());
            }
        }
    }
    confirming
}

pub fn conflicting_factors(panel: &AgentPanel, degradations: &[Degradation]) -> Vec<String> {
    let mut conflicting = Vec::new();
    if !panel.unanimous() {
        conflicting.push("Mixed signals from different agents".to_string());
    }
    for d in degradations {
        if let Degradation::PatternDisagrees { .. } = d {
            conflicting.push(capitalize(&d.to_string()));
        }
    }
    conflicting
}

/// Sentences joined by ". ", ending with a period.
pub fn reasoning(
    panel: &AgentPanel,
    direction: Direction,
    confidence: f64,
    hold_threshold: f64,
    degradations: &[Degradation],
) -> String {
    let mut parts: Vec<String> = Vec::new();

    let long = panel.count(Direction::Long);
    let short = panel.count(Direction::Short);
    if long >= 2 {
        parts.push(format!(
            "Bullish consensus with {}/3 agents recommending LONG positions",
            long
        ));
    } else if short >= 2 {
        parts.push(format!(
            "Bearish consensus with {}/3 agents recommending SHORT positions",
            short
        ));
    } else {
        parts.push("Mixed signals from agents, recommending HOLD".to_string());
    }

    parts.push(format!("Overall confidence score of {:.2}", confidence));
    if long >= 2 || short >= 2 {
        if confidence < hold_threshold {
            parts.push(format!(
                "Confidence below the {:.2} threshold, holding",
                hold_threshold
            ));
        } else if direction == Direction::Hold {
            parts.push("No pattern-backed trade levels, holding".to_string());
        }
    }

    for kind in AgentKind::ALL {
        if panel.get(kind).confidence > STRONG_SUPPORT {
            parts.push(match kind {
                AgentKind::Technical => "Strong technical analysis support".to_string(),
                AgentKind::Macro => "Strong macroeconomic support".to_string(),
                AgentKind::Sentiment => "Strong sentiment analysis support".to_string(),
            });
        }
    }

    for d in degradations {
        parts.push(format!("Note: {}", d));
    }

    parts.join(". ") + "."
}

pub fn recommendations(
    direction: Direction,
    strength: SignalStrength,
    risk: &RiskAssessment,
) -> Vec<String> {
    let mut recs = Vec::new();

    if direction == Direction::Hold {
        recs.push("Wait for clearer signals before entering position".to_string());
        recs.push("Monitor market conditions for better entry points".to_string());
    } else {
        let allocation = match strength {
            SignalStrength::Strong => "full",
            SignalStrength::Moderate => "reduced",
            SignalStrength::Weak => "minimal",
        };
        recs.push(format!(
            "Consider taking position with {} allocation",
            allocation
        ));
        if risk.market_risk == RiskLevel::High {
            recs.push("Use tight stop losses due to high market risk".to_string());
        }
        if risk.liquidity_risk == RiskLevel::High {
            recs.push("Consider smaller position size due to liquidity concerns".to_string());
        }
    }

    recs.push("Monitor position closely and adjust stop loss as needed".to_string());
    recs.push("Review signal after next market session".to_string());
    recs
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
