use serde::{Deserialize, Serialize};

use crate::applicant::{ApplicantInput, CategoryTable, FormSubmission, ParsedApplicant};
use crate::scoring::{FeatureSchema, MockConfig};
use crate::RiskResult;

/// Everything the calculator needs from its caller: category tables for the
/// form, the classifier's column layout, and mock settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskConfig {
    #[serde(default)]
    pub employment_types: CategoryTable,
    #[serde(default)]
    pub location_types: CategoryTable,
    pub schema: FeatureSchema,
    #[serde(default)]
    pub mock: MockConfig,
    /// Classifier artifact to load at start-up, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_path: Option<String>,
}

impl RiskConfig {
    /// Decode and validate a JSON config document.
    pub fn from_json(json: &str) -> RiskResult<Self> {
        let config: RiskConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> RiskResult<()> {
        self.employment_types.validate("employment_types")?;
        self.location_types.validate("location_types")?;
        self.mock.validate()?;
        self.schema.resolve()?;
        Ok(())
    }

    /// Parse a raw form submission with this config's category tables.
    pub fn parse_form(&self, form: &FormSubmission) -> ParsedApplicant {
        ApplicantInput::from_form(form, &self.employment_types, &self.location_types)
    }
}
