use serde::{Deserialize, Serialize};

use super::derived::DerivedFeatures;

/// Full-scale values the result page uses for each gauge.
const EMI_TO_INCOME_SCALE: f64 = 1.0;
const MISSED_EMI_RATE_SCALE: f64 = 10.0;
const DEBT_TO_INCOME_SCALE: f64 = 100.0;
const NET_DISPOSABLE_SCALE: f64 = 2_000_000.0;
const SURPLUS_PER_DEPENDANT_SCALE: f64 = 25_000.0;

/// A derived feature rendered as a progress bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorGauge {
    pub label: String,
    pub value: f64,
    pub scale_max: f64,
    /// value / scale_max clamped to [0, 1]; 0 when the scale is 0.
    pub fill: f64,
}

impl IndicatorGauge {
    pub fn new(label: &str, value: f64, scale_max: f64) -> Self {
        let fill = if scale_max == 0.0 {
            0.0
        } else {
            (value / scale_max).clamp(0.0, 1.0)
        };
        Self {
            label: label.to_string(),
            value,
            scale_max,
            fill,
        }
    }
}

/// One gauge per derived feature, in display order.
pub fn indicator_gauges(features: &DerivedFeatures) -> Vec<IndicatorGauge> {
    vec![
        IndicatorGauge::new("EMI to Income Ratio", features.emi_to_income, EMI_TO_INCOME_SCALE),
        IndicatorGauge::new("Missed EMI Rate", features.missed_emi_rate, MISSED_EMI_RATE_SCALE),
        IndicatorGauge::new(
            "Debt-to-Income (%)",
            features.debt_to_income_pct,
            DEBT_TO_INCOME_SCALE,
        ),
        IndicatorGauge::new(
            "Net Disposable Income",
            features.net_disposable_income,
            NET_DISPOSABLE_SCALE,
        ),
        IndicatorGauge::new(
            "Surplus / Dependant / Month",
            features.surplus_per_dependant_month,
            SURPLUS_PER_DEPENDANT_SCALE,
        ),
    ]
}
