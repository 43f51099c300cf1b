use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

use crate::models::Direction;

/// The three independent opinion sources fused into one decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    Technical,
    Macro,
    Sentiment,
}

impl AgentKind {
    pub const ALL: [AgentKind; 3] = [
        AgentKind::Technical,
        AgentKind::Macro,
        AgentKind::Sentiment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentKind::Technical => "technical",
            AgentKind::Macro => "macro",
            AgentKind::Sentiment => "sentiment",
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw opinion as produced by an upstream agent. Every field may be missing,
/// and a field of the wrong JSON type reads as missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentSignal {
    #[serde(
        default,
        alias = "signal",
        alias = "direction",
        alias = "economic_outlook",
        alias = "sentiment_direction",
        deserialize_with = "lenient_label"
    )]
    pub direction_raw: Option<String>,
    /// Either a fraction in [0,1] or a percentage in (1,100].
    #[serde(default, alias = "confidence", deserialize_with = "lenient_number")]
    pub confidence_raw: Option<f64>,
    #[serde(
        default,
        alias = "key_factors",
        alias = "key_drivers",
        deserialize_with = "lenient_strings"
    )]
    pub factors: Vec<String>,
}

fn lenient_label<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// Numbers, or strings holding a number.
fn lenient_number<'de, D: Deserializer<'de>>(de: D) -> Result<Option<f64>, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Keeps the string entries of an array; anything else is empty.
fn lenient_strings<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

impl AgentSignal {
    pub fn new(direction: &str, confidence: f64) -> Self {
        Self {
            direction_raw: Some(direction.to_string()),
            confidence_raw: Some(confidence),
            factors: Vec::new(),
        }
    }

    pub fn with_factors<I, S>(mut self, factors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.factors = factors.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedSignal {
    pub direction: Direction,
    /// Always within [0,1].
    pub confidence: f64,
    pub factors: Vec<String>,
    /// True when a field was missing or unusable and a default was applied.
    #[serde(default)]
    pub defaulted: bool,
}

/// One normalized signal per agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentPanel {
    pub technical: NormalizedSignal,
    #[serde(rename = "macro")]
    pub macroeconomic: NormalizedSignal,
    pub sentiment: NormalizedSignal,
}

impl AgentPanel {
    pub fn get(&self, kind: AgentKind) -> &NormalizedSignal {
        match kind {
            AgentKind::Technical => &self.technical,
            AgentKind::Macro => &self.macroeconomic,
            AgentKind::Sentiment => &self.sentiment,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (AgentKind, &NormalizedSignal)> + '_ {
        AgentKind::ALL.into_iter().map(move |k| (k, self.get(k)))
    }

    pub fn directions(&self) -> [Direction; 3] {
        [
            self.technical.direction,
            self.macroeconomic.direction,
            self.sentiment.direction,
        ]
    }

    pub fn unanimous(&self) -> bool {
        let [a, b, c] = self.directions();
        a == b && b == c
    }

    pub fn count(&self, direction: Direction) -> usize {
        self.directions().iter().filter(|d| **d == direction).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_upstream_field_names() {
        let json = r#"{"signal":"BUY","confidence":80,"key_factors":["RSI oversold"]}"#;
        let s: AgentSignal = serde_json::from_str(json).unwrap();
        assert_eq!(s.direction_raw.as_deref(), Some("BUY"));
        assert_eq!(s.confidence_raw, Some(80.0));
        assert_eq!(s.factors, vec!["RSI oversold".to_string()]);
    }

    #[test]
    fn missing_fields_default_to_none() {
        let s: AgentSignal = serde_json::from_str("{}").unwrap();
        assert!(s.direction_raw.is_none());
        assert!(s.confidence_raw.is_none());
        assert!(s.factors.is_empty());
    }

    #[test]
    fn wrong_typed_fields_read_as_missing() {
        let s: AgentSignal = serde_json::from_str(r#"{"confidence":"high"}"#).unwrap();
        assert!(s.confidence_raw.is_none());

        let s: AgentSignal = serde_json::from_str(r#"{"signal":42}"#).unwrap();
        assert!(s.direction_raw.is_none());

        let json = r#"{"direction":null,"confidence":"65","key_factors":["CPI", 3, null]}"#;
        let s: AgentSignal = serde_json::from_str(json).unwrap();
        assert!(s.direction_raw.is_none());
        assert_eq!(s.confidence_raw, Some(65.0));
        assert_eq!(s.factors, vec!["CPI".to_string()]);

        let s: AgentSignal = serde_json::from_str(r#"{"key_factors":"CPI"}"#).unwrap();
        assert!(s.factors.is_empty());
    }

    #[test]
    fn deserializes_macro_and_sentiment_agent_names() {
        let json = r#"{"economic_outlook":"bullish","confidence":0.6,"key_drivers":["GDP"]}"#;
        let s: AgentSignal = serde_json::from_str(json).unwrap();
        assert_eq!(s.direction_raw.as_deref(), Some("bullish"));
        assert_eq!(s.factors, vec!["GDP".to_string()]);

        let s: AgentSignal =
            serde_json::from_str(r#"{"sentiment_direction":"bearish"}"#).unwrap();
        assert_eq!(s.direction_raw.as_deref(), Some("bearish"));
    }

    #[test]
    fn panel_counts_and_unanimity() {
        let long = NormalizedSignal {
            direction: Direction::Long,
            confidence: 0.7,
            factors: vec![],
            defaulted: false,
        };
        let panel = AgentPanel {
            technical: long.clone(),
            macroeconomic: long.clone(),
            sentiment: NormalizedSignal {
                direction: Direction::Hold,
                confidence: 0.0,
                factors: vec![],
                defaulted: true,
            },
        };
        assert_eq!(panel.count(Direction::Long), 2);
        assert_eq!(panel.count(Direction::Hold), 1);
        assert!(!panel.unanimous());
        assert_eq!(panel.get(AgentKind::Macro).direction, Direction::Long);
    }
}
