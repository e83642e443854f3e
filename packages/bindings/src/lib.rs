use std::sync::OnceLock;
use std::time::Instant;

use napi::Result as NapiResult;
use napi_derive::napi;

use default_risk_core::applicant::{ApplicantInput, FormSubmission};
use default_risk_core::config::RiskConfig;
use default_risk_core::scoring::{self, Classifier, LogisticModel, MockConfig, ScoringRecord};

/// Classifier shared by every call in this process. Set once by `load_model`.
static MODEL: OnceLock<LogisticModel> = OnceLock::new();

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn loaded_classifier() -> Option<&'static dyn Classifier> {
    MODEL.get().map(|m| m as &dyn Classifier)
}

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

#[napi]
pub fn load_model(model_json: String) -> NapiResult<()> {
    let model = LogisticModel::from_json(&model_json).map_err(to_napi_error)?;
    MODEL
        .set(model)
        .map_err(|_| to_napi_error("a model is already loaded"))
}

#[napi]
pub fn model_loaded() -> bool {
    MODEL.get().is_some()
}

// ---------------------------------------------------------------------------
// Applicant
// ---------------------------------------------------------------------------

#[napi]
pub fn parse_form(form_json: String, config_json: String) -> NapiResult<String> {
    let form: FormSubmission = serde_json::from_str(&form_json).map_err(to_napi_error)?;
    let config = RiskConfig::from_json(&config_json).map_err(to_napi_error)?;
    let parsed = config.parse_form(&form);
    serde_json::to_string(&parsed).map_err(to_napi_error)
}

#[napi]
pub fn compute_features(input_json: String) -> NapiResult<String> {
    let input: ApplicantInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = default_risk_core::features::calculate_features(&input);
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

#[napi]
pub fn build_scoring_record(input_json: String, config_json: String) -> NapiResult<String> {
    let start = Instant::now();
    let input: ApplicantInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let config = RiskConfig::from_json(&config_json).map_err(to_napi_error)?;

    let features = default_risk_core::features::compute_features(&input);
    let record = scoring::build_scoring_record(&input, &features, &config.schema)
        .map_err(to_napi_error)?;
    let output = default_risk_core::with_metadata(
        "Fixed-schema scoring record",
        &input,
        input.range_warnings(),
        start.elapsed().as_micros() as u64,
        record,
    );
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(serde::Deserialize)]
struct ScoreBindingInput {
    record: ScoringRecord,
    #[serde(default)]
    mock: MockConfig,
}

#[napi]
pub fn score_record(input_json: String) -> NapiResult<String> {
    let binding_input: ScoreBindingInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let probability = scoring::score(
        &binding_input.record,
        loaded_classifier(),
        &binding_input.mock,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&probability).map_err(to_napi_error)
}

#[napi]
pub fn assess_applicant(input_json: String, config_json: String) -> NapiResult<String> {
    let input: ApplicantInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let config = RiskConfig::from_json(&config_json).map_err(to_napi_error)?;
    let output = scoring::assess(&input, &config, loaded_classifier());
    serde_json::to_string(&output).map_err(to_napi_error)
}
