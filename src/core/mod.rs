pub mod abcd;
pub mod pivots;
pub mod risk_metrics;
pub mod stat_levels;
pub mod trade_levels;

pub use abcd::{AbcdMatcher, AbcdPattern};
pub use pivots::{Pivot, PivotDetector};
pub use risk_metrics::RiskMetrics;
pub use stat_levels::StatLevels;
pub use trade_levels::TradeLevelCalculator;
