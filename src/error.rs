use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Rejected configuration. Raised at construction, never per call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Agent weights must sum to 1.0, got {sum}")]
    WeightsDoNotSumToOne { sum: f64 },

    #[error("Agent weight {name} is negative or non-finite: {value}")]
    InvalidWeight { name: &'static str, value: f64 },

    #[error("Threshold {name} = {value} out of range [0, 1]")]
    InvalidThreshold { name: &'static str, value: f64 },

    #[error("Invalid value for {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("Window {name} = {value} exceeds {max}")]
    WindowTooLarge {
        name: &'static str,
        value: usize,
        max: usize,
    },

    #[error("Ratio table {0} is empty")]
    EmptyRatioTable(&'static str),
}

/// Internal failure of a synthesis run. Collapsed into a degraded signal
/// by `SignalSynthesizer::synthesize`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SynthesisError {
    #[error("Invalid OHLC series at index {index}: {reason}")]
    InvalidSeries { index: usize, reason: &'static str },

    #[error("Non-finite market context field: {field}")]
    NonFiniteInput { field: &'static str },
}

impl SynthesisError {
    pub fn class(&self) -> FailureClass {
        match self {
            SynthesisError::InvalidSeries { .. } => FailureClass::InvalidSeries,
            SynthesisError::NonFiniteInput { .. } => FailureClass::NonFiniteInput,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureClass {
    InvalidSeries,
    NonFiniteInput,
}

impl fmt::Display for FailureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureClass::InvalidSeries => write!(f, "invalid_series"),
            FailureClass::NonFiniteInput => write!(f, "non_finite_input"),
        }
    }
}
