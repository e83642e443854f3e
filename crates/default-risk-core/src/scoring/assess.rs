use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::classifier::Classifier;
use super::record::{build_scoring_record, ScoringRecord};
use super::score::{mock_score, score, MockConfig, Probability};
use crate::applicant::ApplicantInput;
use crate::config::RiskConfig;
use crate::features::{
    compute_features, income_breakdown, indicator_gauges, DerivedFeatures, IncomeBreakdown,
    IndicatorGauge,
};
use crate::types::{with_metadata, ComputationOutput};

/// Everything a result page needs for one submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// None only when the classifier itself failed.
    pub probability: Option<Probability>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probability_label: Option<String>,
    pub features: DerivedFeatures,
    /// None when the schema did not match the record fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<ScoringRecord>,
    pub indicators: Vec<IndicatorGauge>,
    pub breakdown: IncomeBreakdown,
}

/// Run compute_features, build_scoring_record and score for one applicant.
///
/// Never fails: a schema mismatch (from either the configured schema or the
/// classifier's own feature list) falls back to a mock probability, and a
/// classifier error leaves the probability empty. Both are reported in
/// `warnings`.
pub fn assess(
    input: &ApplicantInput,
    config: &RiskConfig,
    classifier: Option<&dyn Classifier>,
) -> ComputationOutput<RiskAssessment> {
    let start = Instant::now();
    let mut warnings = input.range_warnings();

    let features = compute_features(input);

    let record = match build_scoring_record(input, &features, &config.schema) {
        Ok(r) => Some(r),
        Err(e) => {
            tracing::warn!(error = %e, "scoring record rejected, falling back to mock");
            warnings.push(format!("{}; mock probability used.", e));
            None
        }
    };

    let probability = match (&record, classifier) {
        (Some(record), Some(model)) => match score(record, Some(model), &config.mock) {
            Ok(p) => Some(p),
            Err(e) if e.is_schema_mismatch() => {
                tracing::warn!(error = %e, "classifier schema mismatch, falling back to mock");
                warnings.push(format!("{}; mock probability used.", e));
                draw_mock(&config.mock, &mut warnings)
            }
            Err(e) => {
                tracing::warn!(error = %e, "classifier failed");
                warnings.push(format!("{}; no probability available.", e));
                None
            }
        },
        (Some(_), None) => {
            warnings.push("No classifier loaded; probability is a mock value.".into());
            draw_mock(&config.mock, &mut warnings)
        }
        (None, _) => draw_mock(&config.mock, &mut warnings),
    };

    let assessment = RiskAssessment {
        probability_label: probability.map(|p| p.percent_label()),
        probability,
        indicators: indicator_gauges(&features),
        breakdown: income_breakdown(input),
        features,
        record,
    };

    let assumptions = serde_json::json!({
        "applicant": input,
        "classifier_loaded": classifier.is_some(),
        "schema_columns": config.schema.len(),
        "mock": config.mock,
    });

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Derived ratios -> fixed-schema scoring record -> classifier default probability",
        &assumptions,
        warnings,
        elapsed,
        assessment,
    )
}

fn draw_mock(mock: &MockConfig, warnings: &mut Vec<String>) -> Option<Probability> {
    match mock_score(mock) {
        Ok(p) => Some(p),
        Err(e) => {
            tracing::warn!(error = %e, "mock probability unavailable");
            warnings.push(format!("{}; no probability available.", e));
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
