use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::ConfigError;
use crate::models::AgentKind;

/// Read-only after construction; shared across concurrent synthesis calls.
pub type SharedConfig = Arc<Config>;

pub const DEFAULT_RETRACEMENTS: [f64; 5] = [0.382, 0.5, 0.618, 0.786, 0.886];
pub const DEFAULT_EXTENSIONS: [f64; 5] = [2.618, 2.0, 1.618, 1.272, 1.13];

/// Upper bound for either side of the pivot window.
pub const MAX_PIVOT_WINDOW: usize = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentWeights {
    pub technical: f64,
    #[serde(rename = "macro")]
    pub macroeconomic: f64,
    pub sentiment: f64,
}

impl AgentWeights {
    pub fn get(&self, kind: AgentKind) -> f64 {
        match kind {
            AgentKind::Technical => self.technical,
            AgentKind::Macro => self.macroeconomic,
            AgentKind::Sentiment => self.sentiment,
        }
    }

    pub fn sum(&self) -> f64 {
        self.technical + self.macroeconomic + self.sentiment
    }
}

impl Default for AgentWeights {
    fn default() -> Self {
        Self {
            technical: 0.4,
            macroeconomic: 0.3,
            sentiment: 0.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceThresholds {
    pub strong: f64,
    pub moderate: f64,
    /// Below this, no LONG/SHORT decision is ever emitted.
    pub hold: f64,
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            strong: 0.75,
            moderate: 0.65,
            hold: 0.65,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Pivot detection
    pub pivot_left_window: usize,
    pub pivot_right_window: usize,

    // AB-CD matching (absolute ratio units)
    pub pattern_tolerance: f64,
    pub retracement_ratios: Vec<f64>,
    pub extension_ratios: Vec<f64>,

    // Trade levels
    pub min_point_size: f64,
    pub stop_buffer_ticks: f64,
    pub take_profit_ratio: f64,

    // Fusion
    pub agent_weights: AgentWeights,
    pub thresholds: ConfidenceThresholds,
    pub max_agreement_bonus: f64,
    pub variance_penalty: f64,

    // Risk tiers
    pub volatility_threshold: f64,
    pub medium_risk_factor: f64,
    pub volume_threshold: f64,
    pub avg_volume_window: usize,

    // Technical sub-signal
    pub pattern_confidence: f64,
    pub neutral_confidence: f64,
    pub levels_lookback: usize,

    // Output
    pub price_decimals: u32,

    // Logging
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pivot_left_window: 3,
            pivot_right_window: 3,
            pattern_tolerance: 0.10,
            retracement_ratios: DEFAULT_RETRACEMENTS.to_vec(),
            extension_ratios: DEFAULT_EXTENSIONS.to_vec(),
            min_point_size: 0.0001,
            stop_buffer_ticks: 10.0,
            take_profit_ratio: 0.618,
            agent_weights: AgentWeights::default(),
            thresholds: ConfidenceThresholds::default(),
            max_agreement_bonus: 0.1,
            variance_penalty: 2.0,
            volatility_threshold: 0.20,
            medium_risk_factor: 0.7,
            volume_threshold: 1.5,
            avg_volume_window: 30,
            pattern_confidence: 0.80,
            neutral_confidence: 0.50,
            levels_lookback: 100,
            price_decimals: 5,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let env = |key: &str, default: &str| -> String {
            std::env::var(key).unwrap_or_else(|_| default.to_string())
        };

        let d = Config::default();
        let mut thresholds = d.thresholds;
        thresholds.hold = env("HOLD_THRESHOLD", "0.65").parse().unwrap_or(thresholds.hold);

        Config {
            pivot_left_window: env("PIVOT_LEFT", "3").parse().unwrap_or(d.pivot_left_window),
            pivot_right_window: env("PIVOT_RIGHT", "3")
                .parse()
                .unwrap_or(d.pivot_right_window),
            pattern_tolerance: env("ABCD_TOLERANCE", "0.10")
                .parse()
                .unwrap_or(d.pattern_tolerance),
            min_point_size: env("MIN_POINT_SIZE", "0.0001")
                .parse()
                .unwrap_or(d.min_point_size),
            price_decimals: env("PRICE_DECIMALS", "5").parse().unwrap_or(d.price_decimals),
            log_level: env("LOG_LEVEL", "info"),
            thresholds,
            ..d
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for kind in AgentKind::ALL {
            let w = self.agent_weights.get(kind);
            if !w.is_finite() || w < 0.0 {
                return Err(ConfigError::InvalidWeight {
                    name: kind.as_str(),
                    value: w,
                });
            }
        }
        for (name, value) in [
            ("pivot_left_window", self.pivot_left_window),
            ("pivot_right_window", self.pivot_right_window),
        ] {
            if value > MAX_PIVOT_WINDOW {
                return Err(ConfigError::WindowTooLarge {
                    name,
                    value,
                    max: MAX_PIVOT_WINDOW,
                });
            }
        }

        let sum = self.agent_weights.sum();
        if (sum - 1.0).abs() > 1e-9 {
            return Err(ConfigError::WeightsDoNotSumToOne { sum });
        }

        let t = &self.thresholds;
        let named = [("strong", t.strong), ("moderate", t.moderate), ("hold", t.hold)];
        for (name, value) in named {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidThreshold { name, value });
            }
        }

        let non_negative = [
            ("pattern_tolerance", self.pattern_tolerance),
            ("stop_buffer_ticks", self.stop_buffer_ticks),
            ("take_profit_ratio", self.take_profit_ratio),
            ("max_agreement_bonus", self.max_agreement_bonus),
            ("variance_penalty", self.variance_penalty),
            ("volatility_threshold", self.volatility_threshold),
            ("medium_risk_factor", self.medium_risk_factor),
            ("volume_threshold", self.volume_threshold),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidParameter { name, value });
            }
        }
        if !self.min_point_size.is_finite() || self.min_point_size <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "min_point_size",
                value: self.min_point_size,
            });
        }
        for (name, value) in [
            ("pattern_confidence", self.pattern_confidence),
            ("neutral_confidence", self.neutral_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidThreshold { name, value });
            }
        }

        if self.retracement_ratios.is_empty() {
            return Err(ConfigError::EmptyRatioTable("retracement_ratios"));
        }
        if self.extension_ratios.is_empty() {
            return Err(ConfigError::EmptyRatioTable("extension_ratios"));
        }
        Ok(())
    }

    /// Minimum series length for a single pivot candidate.
    pub fn min_pivot_candles(&self) -> usize {
        self.pivot_left_window
            .saturating_add(self.pivot_right_window)
            .saturating_add(1)
    }

    pub fn shared(self) -> SharedConfig {
        Arc::new(self)
    }
}
