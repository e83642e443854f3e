pub mod breakdown;
pub mod derived;
pub mod indicators;

pub use breakdown::{income_breakdown, IncomeBreakdown};
pub use derived::{calculate_features, compute_features, DerivedFeatures};
pub use indicators::{indicator_gauges, IndicatorGauge};
