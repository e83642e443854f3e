use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::classifier::{Classifier, DEFAULT_CLASS};
use super::record::ScoringRecord;
use crate::error::RiskError;
use crate::RiskResult;

/// Where a probability came from. Mock values are filler, not predictions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbabilitySource {
    Model,
    Mock,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Probability {
    /// Probability of the default class, in [0, 1].
    pub value: f64,
    pub source: ProbabilitySource,
}

impl Probability {
    pub fn is_mock(&self) -> bool {
        self.source == ProbabilitySource::Mock
    }

    /// Whole-percent label, e.g. "42%".
    pub fn percent_label(&self) -> String {
        format!("{:.0}%", self.value * 100.0)
    }
}

/// Settings for the filler probability used when no classifier is loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MockConfig {
    pub min: f64,
    pub max: f64,
    /// Decimal places kept after sampling.
    pub decimals: u32,
    /// Optional seed for reproducibility.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            min: 0.05,
            max: 0.85,
            decimals: 2,
            seed: None,
        }
    }
}

impl MockConfig {
    /// Bounds must sit inside [0, 1] and on the rounding grid, so a rounded
    /// sample can never leave the range.
    pub fn validate(&self) -> RiskResult<()> {
        if !(0.0..=1.0).contains(&self.min) || !(0.0..=1.0).contains(&self.max) {
            return Err(RiskError::InvalidInput {
                field: "mock".into(),
                reason: "Bounds must lie in [0, 1].".into(),
            });
        }
        if self.min > self.max {
            return Err(RiskError::InvalidInput {
                field: "mock".into(),
                reason: format!("min {} exceeds max {}.", self.min, self.max),
            });
        }
        if self.decimals > 10 {
            return Err(RiskError::InvalidInput {
                field: "mock.decimals".into(),
                reason: "At most 10 decimal places.".into(),
            });
        }
        for (name, bound) in [("mock.min", self.min), ("mock.max", self.max)] {
            let on_grid = Decimal::from_f64(bound)
                .map(|d| d.round_dp(self.decimals) == d)
                .unwrap_or(false);
            if !on_grid {
                return Err(RiskError::InvalidInput {
                    field: name.into(),
                    reason: format!("{} has more than {} decimal places.", bound, self.decimals),
                });
            }
        }
        Ok(())
    }
}

/// Score a record.
///
/// With a classifier, the record's columns must equal the classifier's
/// feature names (names, order, count) before it is invoked; the returned
/// value is the default-class probability. Without one, a uniformly drawn
/// filler value flagged as [`ProbabilitySource::Mock`] is returned.
pub fn score(
    record: &ScoringRecord,
    classifier: Option<&dyn Classifier>,
    mock: &MockConfig,
) -> RiskResult<Probability> {
    match classifier {
        Some(model) => model_probability(record, model),
        None => mock_score(mock),
    }
}

/// Draw a filler probability, seeded when the config carries a seed.
pub fn mock_score(mock: &MockConfig) -> RiskResult<Probability> {
    let mut rng = match mock.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    mock_probability(mock, &mut rng)
}

/// [`score`] with a caller-owned random source for the mock path.
pub fn score_with_rng<R: Rng>(
    record: &ScoringRecord,
    classifier: Option<&dyn Classifier>,
    mock: &MockConfig,
    rng: &mut R,
) -> RiskResult<Probability> {
    match classifier {
        Some(model) => model_probability(record, model),
        None => mock_probability(mock, rng),
    }
}

/// Fails with `SchemaMismatch` when the record's columns differ from what
/// the classifier was trained on.
pub fn check_record_schema(record: &ScoringRecord, expected: &[String]) -> RiskResult<()> {
    if record.values.len() != record.columns.len() {
        return Err(RiskError::schema_mismatch(format!(
            "record has {} columns but {} values",
            record.columns.len(),
            record.values.len()
        )));
    }
    if record.columns.as_slice() == expected {
        return Ok(());
    }

    let missing: Vec<String> = expected
        .iter()
        .filter(|c| !record.columns.contains(*c))
        .cloned()
        .collect();
    let unexpected: Vec<String> = record
        .columns
        .iter()
        .filter(|c| !expected.contains(*c))
        .cloned()
        .collect();

    let detail = if missing.is_empty() && unexpected.is_empty() {
        if record.columns.len() == expected.len() {
            "column order differs from the classifier's".to_string()
        } else {
            format!(
                "record has {} columns, classifier expects {}",
                record.columns.len(),
                expected.len()
            )
        }
    } else {
        "record columns differ from the classifier's".to_string()
    };

    Err(RiskError::SchemaMismatch {
        missing,
        unexpected,
        detail,
    })
}

fn model_probability(record: &ScoringRecord, model: &dyn Classifier) -> RiskResult<Probability> {
    check_record_schema(record, model.feature_names())?;

    let classes = model.predict_proba(record).map_err(|e| match e {
        RiskError::ScoringError(_) => e,
        other => RiskError::ScoringError(other.to_string()),
    })?;
    let value = *classes.get(DEFAULT_CLASS).ok_or_else(|| {
        RiskError::ScoringError(format!(
            "classifier returned {} class probabilities",
            classes.len()
        ))
    })?;
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(RiskError::ScoringError(format!(
            "default probability {} is outside [0, 1]",
            value
        )));
    }

    tracing::debug!(probability = value, "classifier scored record");
    Ok(Probability {
        value,
        source: ProbabilitySource::Model,
    })
}

fn mock_probability<R: Rng>(mock: &MockConfig, rng: &mut R) -> RiskResult<Probability> {
    mock.validate()?;

    let raw: f64 = rng.gen_range(mock.min..=mock.max);
    let value = Decimal::from_f64(raw)
        .map(|d| d.round_dp(mock.decimals))
        .and_then(|d| d.to_f64())
        .ok_or_else(|| RiskError::ScoringError(format!("cannot round mock value {}", raw)))?;

    tracing::debug!(probability = value, "mock probability drawn");
    Ok(Probability {
        value,
        source: ProbabilitySource::Mock,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
