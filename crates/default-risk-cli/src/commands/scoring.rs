use clap::Args;
use serde_json::{json, Value};
use std::time::Instant;

use default_risk_core::features::compute_features;
use default_risk_core::scoring::{self, build_scoring_record, Classifier, LogisticModel};
use default_risk_core::with_metadata;

use super::applicant::{load_applicant, ApplicantArgs};
use crate::input;

/// Arguments for scoring-record assembly
#[derive(Args)]
pub struct RecordArgs {
    #[command(flatten)]
    pub applicant: ApplicantArgs,

    /// Config file (YAML or JSON) with the scoring schema
    #[arg(long)]
    pub config: String,
}

/// Arguments for an end-to-end assessment
#[derive(Args)]
pub struct AssessArgs {
    #[command(flatten)]
    pub applicant: ApplicantArgs,

    /// Config file (YAML or JSON) with the scoring schema
    #[arg(long)]
    pub config: String,

    /// Logistic-regression artifact (overrides the config's model_path)
    #[arg(long)]
    pub model: Option<String>,

    /// Ignore any model and return a mock probability
    #[arg(long, conflicts_with = "model")]
    pub mock: bool,

    /// Seed for the mock probability
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Arguments for listing the schema
#[derive(Args)]
pub struct SchemaArgs {
    /// Config file (YAML or JSON) with the scoring schema
    #[arg(long)]
    pub config: String,
}

pub fn run_record(args: RecordArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let config = input::config::read_config(&args.config)?;
    let parsed = load_applicant(&args.applicant, Some(&config))?;

    let features = compute_features(&parsed.input);
    let record = build_scoring_record(&parsed.input, &features, &config.schema)?;

    let mut warnings = parsed.warnings;
    warnings.extend(parsed.input.range_warnings());

    let output = with_metadata(
        "Fixed-schema scoring record",
        &parsed.input,
        warnings,
        start.elapsed().as_micros() as u64,
        record,
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_assess(args: AssessArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut config = input::config::read_config(&args.config)?;
    if args.seed.is_some() {
        config.mock.seed = args.seed;
    }
    let parsed = load_applicant(&args.applicant, Some(&config))?;

    let mut load_warnings = Vec::new();
    let model: Option<LogisticModel> = if args.mock {
        None
    } else if let Some(ref path) = args.model {
        Some(input::config::read_model(path)?)
    } else if let Some(ref path) = config.model_path {
        let resolved = input::config::configured_model_path(&args.config, path);
        if resolved.is_file() {
            Some(input::config::read_model(&resolved.to_string_lossy())?)
        } else {
            tracing::warn!(path = %resolved.display(), "model not found, using mock predictions");
            load_warnings.push(format!(
                "Model not found at {}; using mock predictions.",
                resolved.display()
            ));
            None
        }
    } else {
        None
    };

    let classifier = model.as_ref().map(|m| m as &dyn Classifier);
    let mut output = scoring::assess(&parsed.input, &config, classifier);

    let mut warnings = parsed.warnings;
    warnings.append(&mut load_warnings);
    warnings.append(&mut output.warnings);
    output.warnings = warnings;

    Ok(serde_json::to_value(output)?)
}

pub fn run_schema(args: SchemaArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let config = input::config::read_config(&args.config)?;
    let rows: Vec<Value> = config
        .schema
        .columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            json!({
                "position": i + 1,
                "field": c.field,
                "name": c.name,
            })
        })
        .collect();
    Ok(Value::Array(rows))
}
