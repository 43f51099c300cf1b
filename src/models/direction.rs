use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed trade direction. Raw agent labels are mapped onto it once, at
/// ingestion, by [`Direction::from_label`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Long,
    Short,
    Hold,
}

impl Default for Direction {
    fn default() -> Self {
        Direction::Hold
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Long => "LONG",
            Direction::Short => "SHORT",
            Direction::Hold => "HOLD",
        }
    }

    /// BUY/LONG/BULLISH => Long, SELL/SHORT/BEARISH => Short, anything else
    /// (including the empty string) => Hold. Case and surrounding whitespace
    /// are ignored.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "BUY" | "LONG" | "BULLISH" => Direction::Long,
            "SELL" | "SHORT" | "BEARISH" => Direction::Short,
            _ => Direction::Hold,
        }
    }

    pub fn is_actionable(self) -> bool {
        self != Direction::Hold
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwingType {
    High,
    Low,
}

impl fmt::Display for SwingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwingType::High => write!(f, "High"),
            SwingType::Low => write!(f, "Low"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatternType {
    Bullish,
    Bearish,
}

impl fmt::Display for PatternType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternType::Bullish => write!(f, "Bullish"),
            PatternType::Bearish => write!(f, "Bearish"),
        }
    }
}

impl PatternType {
    pub fn to_direction(self) -> Direction {
        match self {
            PatternType::Bullish => Direction::Long,
            PatternType::Bearish => Direction::Short,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalStrength {
    Strong,
    Moderate,
    Weak,
}

impl fmt::Display for SignalStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalStrength::Strong => write!(f, "STRONG"),
            SignalStrength::Moderate => write!(f, "MODERATE"),
            SignalStrength::Weak => write!(f, "WEAK"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "LOW"),
            RiskLevel::Medium => write!(f, "MEDIUM"),
            RiskLevel::High => write!(f, "HIGH"),
        }
    }
}
