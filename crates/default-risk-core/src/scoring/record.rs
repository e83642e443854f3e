use serde::{Deserialize, Serialize};

use super::schema::FeatureSchema;
use crate::applicant::ApplicantInput;
use crate::features::DerivedFeatures;
use crate::RiskResult;

/// A single row of named numeric columns, ready for the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringRecord {
    pub columns: Vec<String>,
    pub values: Vec<f64>,
}

impl ScoringRecord {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|i| self.values.get(i).copied())
    }

    /// (column, value) pairs in record order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.columns
            .iter()
            .map(|c| c.as_str())
            .zip(self.values.iter().copied())
    }
}

/// Assemble the record in schema order.
///
/// Fails with `SchemaMismatch` before producing anything if the schema does
/// not cover exactly the applicant and derived fields; no column is ever
/// filled with a placeholder.
pub fn build_scoring_record(
    input: &ApplicantInput,
    features: &DerivedFeatures,
    schema: &FeatureSchema,
) -> RiskResult<ScoringRecord> {
    let fields = schema.resolve()?;

    let columns = schema.columns.iter().map(|c| c.name.clone()).collect();
    let values = fields.iter().map(|f| f.value(input, features)).collect();

    Ok(ScoringRecord { columns, values })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::compute_features;
    use crate::scoring::schema::{FeatureField, SchemaColumn};
    use pretty_assertions::assert_eq;

    fn sample() -> ApplicantInput {
        ApplicantInput {
            employment_type: 4,
            current_employment_years: 3,
            total_employment_years: 8,
            sbi_customer: true,
            location_type: 2,
            dependants: 2,
            income: 500_000.0,
            other_amis: 100_000.0,
            loan_amount: 200_000.0,
            loan_tenure: 5,
            cibil_rank: 8,
            cibil_score: 780,
            dpd: 10,
            max_dpd: 40,
            missed_emis: 1,
        }
    }

    fn labelled_schema() -> FeatureSchema {
        FeatureSchema::new(
            FeatureField::ALL
                .iter()
                .map(|f| SchemaColumn {
                    name: f.as_str().replace('_', " ").to_uppercase(),
                    field: f.to_string(),
                })
                .collect(),
        )
    }

    #[test]
    fn test_record_follows_schema() {
        let input = sample();
        let features = compute_features(&input);
        let record = build_scoring_record(&input, &features, &labelled_schema()).unwrap();

        assert_eq!(record.len(), 20);
        assert_eq!(record.columns[0], "EMPLOYMENT TYPE");
        assert_eq!(record.get("EMPLOYMENT TYPE"), Some(4.0));
        assert_eq!(record.get("SBI CUSTOMER"), Some(1.0));
        assert_eq!(record.get("DEBT TO INCOME PCT"), Some(60.0));
        assert_eq!(record.get("EMI TO INCOME"), Some(0.6));
        assert_eq!(record.get("nope"), None);
    }

    #[test]
    fn test_record_order_tracks_schema_order() {
        let input = sample();
        let features = compute_features(&input);
        let mut schema = labelled_schema();
        schema.columns.swap(0, 19);

        let record = build_scoring_record(&input, &features, &schema).unwrap();
        let first: Vec<(&str, f64)> = record.iter().take(1).collect();
        assert_eq!(
            first,
            vec![("SURPLUS PER DEPENDANT MONTH", 200_000.0 / 24.0)]
        );
        assert_eq!(record.values[19], 4.0);
    }

    #[test]
    fn test_get_tolerates_short_values() {
        let record: ScoringRecord =
            serde_json::from_str(r#"{"columns": ["a", "b"], "values": [1.0]}"#).unwrap();
        assert_eq!(record.get("a"), Some(1.0));
        assert_eq!(record.get("b"), None);
    }

    #[test]
    fn test_placeholder_field_fails_fast() {
        let input = sample();
        let features = compute_features(&input);
        let mut schema = labelled_schema();
        schema.columns[15].field = "zero".into();

        let err = build_scoring_record(&input, &features, &schema).unwrap_err();
        assert!(err.is_schema_mismatch());
        assert!(err.to_string().contains("EMI TO INCOME (zero)"));
    }
}
