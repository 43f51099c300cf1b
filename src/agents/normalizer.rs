use crate::models::{AgentSignal, Direction, NormalizedSignal};

/// Maps a raw agent opinion onto the closed direction enum and a [0,1]
/// confidence. Total: unusable fields fall back to HOLD / 0.0 and the result
/// is flagged as `defaulted`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalNormalizer;

impl SignalNormalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&self, raw: &AgentSignal) -> NormalizedSignal {
        let mut defaulted = false;

        let direction = match raw.direction_raw.as_deref() {
            Some(label) => Direction::from_label(label),
            None => {
                defaulted = true;
                Direction::Hold
            }
        };

        let confidence = match raw.confidence_raw {
            Some(c) if c.is_finite() => normalize_confidence(c),
            _ => {
                defaulted = true;
                0.0
            }
        };

        NormalizedSignal {
            direction,
            confidence,
            factors: raw.factors.clone(),
            defaulted,
        }
    }
}

/// Values above 1 are read as percentages. The result is clamped to [0,1].
pub fn normalize_confidence(raw: f64) -> f64 {
    let scaled = if raw > 1.0 { raw / 100.0 } else { raw };
    scaled.clamp(0.0, 1.0)
}
