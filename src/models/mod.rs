pub mod agent;
pub mod candle;
pub mod direction;
pub mod market;
pub mod signal;

pub use agent::{AgentKind, AgentPanel, AgentSignal, NormalizedSignal};
pub use candle::{Candle, CandleSeries};
pub use direction::*;
pub use market::{MarketContext, Quotes};
pub use signal::{
    Degradation, PartialRiskAssessment, QualityMetrics, ReviewWindow, RiskAssessment,
    SynthesizedSignal, TradeLevels,
};
