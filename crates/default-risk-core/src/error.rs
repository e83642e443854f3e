use thiserror::Error;

#[derive(Debug, Error)]
pub enum RiskError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error(
        "Schema mismatch: {detail} (missing: [{}], unexpected: [{}])",
        .missing.join(", "),
        .unexpected.join(", ")
    )]
    SchemaMismatch {
        missing: Vec<String>,
        unexpected: Vec<String>,
        detail: String,
    },

    #[error("Scoring error: {0}")]
    ScoringError(String),

    #[error("Model load error: {0}")]
    ModelLoad(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl RiskError {
    pub fn schema_mismatch(detail: impl Into<String>) -> Self {
        RiskError::SchemaMismatch {
            missing: Vec::new(),
            unexpected: Vec::new(),
            detail: detail.into(),
        }
    }

    /// True for failures the assessment pipeline recovers from via the mock path.
    pub fn is_schema_mismatch(&self) -> bool {
        matches!(self, RiskError::SchemaMismatch { .. })
    }
}

impl From<serde_json::Error> for RiskError {
    fn from(e: serde_json::Error) -> Self {
        RiskError::SerializationError(e.to_string())
    }
}
