pub mod normalizer;
pub mod technical;

pub use normalizer::{normalize_confidence, SignalNormalizer};
pub use technical::{TechnicalAnalyzer, TechnicalReport};
