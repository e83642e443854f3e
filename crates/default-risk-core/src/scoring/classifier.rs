//! The external classifier seam and the shipped logistic-regression artifact.
//!
//! A classifier is loaded once, shared read-only, and asked for class
//! probabilities one record at a time. Implementations must be reentrant,
//! hence the `Send + Sync` bound.

use serde::{Deserialize, Serialize};

use super::record::ScoringRecord;
use crate::error::RiskError;
use crate::RiskResult;

/// Index of the "default" class in `predict_proba` output.
pub const DEFAULT_CLASS: usize = 1;

/// A pre-trained binary classifier.
pub trait Classifier: Send + Sync {
    /// Column names in the order the model was trained on.
    fn feature_names(&self) -> &[String];

    /// Class probabilities for one record, indexed by class
    /// (0 = repaid, 1 = default).
    fn predict_proba(&self, record: &ScoringRecord) -> RiskResult<Vec<f64>>;
}

// ---------------------------------------------------------------------------
// Logistic regression artifact
// ---------------------------------------------------------------------------

/// Per-column standardisation applied before the linear predictor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// A logistic regression exported as JSON:
/// p(default) = sigmoid(intercept + sum_i coef_i * (x_i - mean_i) / scale_i).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaler: Option<StandardScaler>,
}

impl LogisticModel {
    /// Decode and validate an artifact.
    pub fn from_json(json: &str) -> RiskResult<Self> {
        let model: LogisticModel =
            serde_json::from_str(json).map_err(|e| RiskError::ModelLoad(e.to_string()))?;
        model.validate()?;
        Ok(model)
    }

    pub fn validate(&self) -> RiskResult<()> {
        let n = self.feature_names.len();
        if n == 0 {
            return Err(RiskError::ModelLoad("model has no features".into()));
        }
        if self.coefficients.len() != n {
            return Err(RiskError::ModelLoad(format!(
                "{} coefficients for {} features",
                self.coefficients.len(),
                n
            )));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(RiskError::ModelLoad("non-finite coefficient".into()));
        }
        if let Some(scaler) = &self.scaler {
            if scaler.mean.len() != n || scaler.scale.len() != n {
                return Err(RiskError::ModelLoad(format!(
                    "scaler has {} means and {} scales for {} features",
                    scaler.mean.len(),
                    scaler.scale.len(),
                    n
                )));
            }
            if scaler.scale.iter().any(|s| *s == 0.0 || !s.is_finite()) {
                return Err(RiskError::ModelLoad("scaler scale must be finite and non-zero".into()));
            }
        }
        Ok(())
    }

    fn linear_predictor(&self, values: &[f64]) -> f64 {
        let mut z = self.intercept;
        for (i, (x, coef)) in values.iter().zip(&self.coefficients).enumerate() {
            let x = match &self.scaler {
                Some(s) => (x - s.mean[i]) / s.scale[i],
                None => *x,
            };
            z += coef * x;
        }
        z
    }
}

impl Classifier for LogisticModel {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict_proba(&self, record: &ScoringRecord) -> RiskResult<Vec<f64>> {
        // Fields are public, so a model may not have gone through from_json.
        self.validate().map_err(|e| RiskError::ScoringError(e.to_string()))?;
        if record.len() != self.coefficients.len() {
            return Err(RiskError::ScoringError(format!(
                "record has {} values, model expects {}",
                record.len(),
                self.coefficients.len()
            )));
        }
        if record.values.iter().any(|v| !v.is_finite()) {
            return Err(RiskError::ScoringError("record contains a non-finite value".into()));
        }

        let z = self.linear_predictor(&record.values);
        let p = 1.0 / (1.0 + (-z).exp());
        if !p.is_finite() {
            return Err(RiskError::ScoringError(format!("linear predictor {} overflowed", z)));
        }
        Ok(vec![1.0 - p, p])
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn model(coefficients: Vec<f64>, intercept: f64) -> LogisticModel {
        LogisticModel {
            feature_names: (0..coefficients.len()).map(|i| format!("x{}", i)).collect(),
            coefficients,
            intercept,
            scaler: None,
        }
    }

    fn record(values: Vec<f64>) -> ScoringRecord {
        ScoringRecord {
            columns: (0..values.len()).map(|i| format!("x{}", i)).collect(),
            values,
        }
    }

    #[test]
    fn test_zero_model_is_even_odds() {
        let m = model(vec![0.0, 0.0], 0.0);
        let p = m.predict_proba(&record(vec![123.0, -4.0])).unwrap();
        assert_eq!(p, vec![0.5, 0.5]);
    }

    #[test]
    fn test_positive_predictor_raises_default_probability() {
        let m = model(vec![1.0], 0.0);
        let p = m.predict_proba(&record(vec![2.0])).unwrap();
        assert!(p[DEFAULT_CLASS] > 0.88 && p[DEFAULT_CLASS] < 0.89);
        assert!((p[0] + p[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_scaler_is_applied() {
        let mut m = model(vec![1.0], 0.0);
        m.scaler = Some(StandardScaler {
            mean: vec![10.0],
            scale: vec![5.0],
        });
        let p = m.predict_proba(&record(vec![10.0])).unwrap();
        assert_eq!(p[DEFAULT_CLASS], 0.5);
    }

    #[test]
    fn test_length_mismatch_is_scoring_error() {
        let m = model(vec![1.0, 2.0], 0.0);
        let err = m.predict_proba(&record(vec![1.0])).unwrap_err();
        assert!(matches!(err, RiskError::ScoringError(_)));
    }

    #[test]
    fn test_unvalidated_short_scaler_is_scoring_error() {
        let json = r#"{"feature_names": ["a", "b"], "coefficients": [0.1, 0.2], "intercept": 0.0,
            "scaler": {"mean": [0.0], "scale": [1.0]}}"#;
        let m: LogisticModel = serde_json::from_str(json).unwrap();
        let err = m.predict_proba(&record(vec![1.0, 2.0])).unwrap_err();
        assert!(matches!(err, RiskError::ScoringError(ref msg) if msg.contains("scaler")));
    }

    #[test]
    fn test_from_json_validates() {
        let ok = r#"{"feature_names": ["a", "b"], "coefficients": [0.1, -0.2], "intercept": 0.3}"#;
        assert!(LogisticModel::from_json(ok).is_ok());

        let short = r#"{"feature_names": ["a", "b"], "coefficients": [0.1], "intercept": 0.3}"#;
        assert!(matches!(
            LogisticModel::from_json(short),
            Err(RiskError::ModelLoad(_))
        ));

        let bad_scale = r#"{"feature_names": ["a"], "coefficients": [1.0], "intercept": 0.0,
            "scaler": {"mean": [0.0], "scale": [0.0]}}"#;
        assert!(LogisticModel::from_json(bad_scale).is_err());

        assert!(LogisticModel::from_json("not json").is_err());
    }
}
