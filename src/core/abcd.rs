use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{Config, DEFAULT_EXTENSIONS, DEFAULT_RETRACEMENTS};
use crate::core::pivots::Pivot;
use crate::models::{PatternType, SwingType};

/// Four alternating pivots whose BC retracement and CD extension match
/// Fibonacci ratios. D is the newest pivot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AbcdPattern {
    pub a: Pivot,
    pub b: Pivot,
    pub c: Pivot,
    pub d: Pivot,
    pub pattern_type: PatternType,
    pub used_retracement: f64,
    pub used_extension: f64,
}

impl AbcdPattern {
    /// Length of the BC leg, positive for both biases.
    pub fn bc_leg(&self) -> f64 {
        match self.pattern_type {
            PatternType::Bullish => self.c.price - self.b.price,
            PatternType::Bearish => self.b.price - self.c.price,
        }
    }

    pub fn cd_range(&self) -> f64 {
        (self.c.price - self.d.price).abs()
    }
}

/// Matches the last four pivots against the retracement/extension tables.
///
/// Ratio pairs are tried retracement-major in table order and the first pair
/// within tolerance wins, even when a later pair would fit more closely.
#[derive(Debug, Clone)]
pub struct AbcdMatcher {
    pub tolerance: f64,
    pub retracements: Vec<f64>,
    pub extensions: Vec<f64>,
}

impl Default for AbcdMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl AbcdMatcher {
    pub fn new() -> Self {
        Self::with_tolerance(0.10)
    }

    pub fn with_tolerance(tolerance: f64) -> Self {
        Self {
            tolerance,
            retracements: DEFAULT_RETRACEMENTS.to_vec(),
            extensions: DEFAULT_EXTENSIONS.to_vec(),
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self {
            tolerance: cfg.pattern_tolerance,
            retracements: cfg.retracement_ratios.clone(),
            extensions: cfg.extension_ratios.clone(),
        }
    }

    pub fn find(&self, pivots: &[Pivot]) -> Option<AbcdPattern> {
        let [a, b, c, d] = match pivots {
            [.., a, b, c, d] => [*a, *b, *c, *d],
            _ => return None,
        };

        let types = [a.swing_type, b.swing_type, c.swing_type, d.swing_type];
        let (pattern_type, ab, bc, cd, d_beyond_b) = match types {
            [SwingType::High, SwingType::Low, SwingType::High, SwingType::Low] => (
                PatternType::Bullish,
                a.price - b.price,
                c.price - b.price,
                c.price - d.price,
                d.price < b.price,
            ),
            [SwingType::Low, SwingType::High, SwingType::Low, SwingType::High] => (
                PatternType::Bearish,
                b.price - a.price,
                b.price - c.price,
                d.price - c.price,
                d.price > b.price,
            ),
            _ => return None,
        };

        // A degenerate BC leg cannot anchor an extension.
        if ab <= 0.0 || bc <= 0.0 || !d_beyond_b {
            return None;
        }

        let retrace = bc / ab;
        let extension = cd / bc;
        let (used_retracement, used_extension) = self.first_match(retrace, extension)?;

        debug!(
            "{} AB-CD matched: retrace {:.3} ~ {}, extension {:.3} ~ {}",
            pattern_type, retrace, used_retracement, extension, used_extension
        );

        Some(AbcdPattern {
            a,
            b,
            c,
            d,
            pattern_type,
            used_retracement,
            used_extension,
        })
    }

    fn first_match(&self, retrace: f64, extension: f64) -> Option<(f64, f64)> {
        for &r in &self.retracements {
            if (retrace - r).abs() > self.tolerance {
                continue;
            }
            for &e in &self.extensions {
                if (extension - e).abs() <= self.tolerance {
                    return Some((r, e));
                }
            }
        }
        None
    }
}
