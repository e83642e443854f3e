//! Lenient parsing of raw form submissions.
//!
//! Sliders, dropdowns and free-text boxes all arrive as loosely typed JSON
//! scalars. A value that is missing or cannot be parsed is replaced by 0 (or
//! `false`) and reported as a warning, so one bad entry never blocks the
//! whole assessment.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::categories::CategoryTable;
use super::input::ApplicantInput;
use crate::error::RiskError;

/// Every field name a submission may carry.
pub const FORM_FIELDS: [&str; 15] = [
    "employment_type",
    "current_employment_years",
    "total_employment_years",
    "sbi_customer",
    "location_type",
    "dependants",
    "income",
    "other_amis",
    "loan_amount",
    "loan_tenure",
    "cibil_rank",
    "cibil_score",
    "dpd",
    "max_dpd",
    "missed_emis",
];

/// Raw values keyed by field name, exactly as the form submitted them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormSubmission {
    values: BTreeMap<String, Value>,
}

impl FormSubmission {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(field.into(), value.into());
    }

    /// Builder form of [`FormSubmission::insert`].
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A typed applicant plus one warning per value that had to be defaulted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedApplicant {
    pub input: ApplicantInput,
    pub warnings: Vec<String>,
}

impl ApplicantInput {
    /// Parse a raw submission, resolving category labels through the
    /// caller's tables.
    pub fn from_form(
        form: &FormSubmission,
        employment_types: &CategoryTable,
        location_types: &CategoryTable,
    ) -> ParsedApplicant {
        let mut reader = FieldReader {
            form,
            warnings: Vec::new(),
        };

        for key in form.values.keys() {
            if !FORM_FIELDS.contains(&key.as_str()) {
                reader.warnings.push(format!("Ignoring unknown form field '{}'.", key));
            }
        }

        let input = ApplicantInput {
            employment_type: reader.category("employment_type", employment_types),
            current_employment_years: reader.count("current_employment_years"),
            total_employment_years: reader.count("total_employment_years"),
            sbi_customer: reader.flag("sbi_customer"),
            location_type: reader.category("location_type", location_types),
            dependants: reader.count("dependants"),
            income: reader.money("income"),
            other_amis: reader.money("other_amis"),
            loan_amount: reader.money("loan_amount"),
            loan_tenure: reader.count("loan_tenure"),
            cibil_rank: reader.code("cibil_rank"),
            cibil_score: reader.count("cibil_score"),
            dpd: reader.count("dpd"),
            max_dpd: reader.count("max_dpd"),
            missed_emis: reader.count("missed_emis"),
        };

        ParsedApplicant {
            input,
            warnings: reader.warnings,
        }
    }
}

// ---------------------------------------------------------------------------
// Field parsing
// ---------------------------------------------------------------------------

struct FieldReader<'a> {
    form: &'a FormSubmission,
    warnings: Vec<String>,
}

impl<'a> FieldReader<'a> {
    fn defaulted(&mut self, field: &str, reason: String) {
        let err = RiskError::InvalidInput {
            field: field.to_string(),
            reason: format!("{}; defaulted to 0", reason),
        };
        tracing::debug!(field = %field, "form value defaulted");
        self.warnings.push(err.to_string());
    }

    /// Fetch a value, treating null and blank strings as absent.
    fn present(&self, field: &str) -> Option<&'a Value> {
        match self.form.get(field) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.trim().is_empty() => None,
            Some(v) => Some(v),
        }
    }

    fn number(&mut self, field: &str) -> Option<f64> {
        let raw = match self.present(field) {
            Some(v) => v.clone(),
            None => {
                self.defaulted(field, "value is missing".into());
                return None;
            }
        };
        match parse_number(&raw) {
            Some(n) => Some(n),
            None => {
                self.defaulted(field, format!("cannot parse {} as a number", raw));
                None
            }
        }
    }

    fn money(&mut self, field: &str) -> f64 {
        match self.number(field) {
            Some(n) if n < 0.0 => {
                self.defaulted(field, format!("amount {} is negative", n));
                0.0
            }
            Some(n) => n,
            None => 0.0,
        }
    }

    fn whole(&mut self, field: &str, max: f64) -> Option<f64> {
        let n = self.number(field)?;
        if n < 0.0 || n.fract() != 0.0 || n > max {
            self.defaulted(field, format!("{} is not a whole number in 0..={}", n, max));
            return None;
        }
        Some(n)
    }

    fn count(&mut self, field: &str) -> u32 {
        self.whole(field, u32::MAX as f64).map(|n| n as u32).unwrap_or(0)
    }

    fn code(&mut self, field: &str) -> u8 {
        self.whole(field, u8::MAX as f64).map(|n| n as u8).unwrap_or(0)
    }

    fn flag(&mut self, field: &str) -> bool {
        let parsed = match self.present(field) {
            Some(Value::Bool(b)) => Some(*b),
            Some(Value::Number(n)) => match n.as_f64() {
                Some(x) if x == 0.0 => Some(false),
                Some(x) if x == 1.0 => Some(true),
                _ => None,
            },
            Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "yes" | "y" | "true" | "1" => Some(true),
                "no" | "n" | "false" | "0" => Some(false),
                _ => None,
            },
            Some(_) => None,
            None => {
                self.defaulted(field, "value is missing".into());
                return false;
            }
        };
        parsed.unwrap_or_else(|| {
            self.defaulted(field, "expected yes/no".into());
            false
        })
    }

    fn category(&mut self, field: &str, table: &CategoryTable) -> u8 {
        let label = match self.present(field) {
            Some(Value::String(s)) if parse_text(s).is_none() => Some(s.clone()),
            Some(_) => None,
            None => {
                self.defaulted(field, "value is missing".into());
                return 0;
            }
        };

        match label {
            Some(label) => match table.code_for(&label) {
                Some(code) => code,
                None => {
                    self.defaulted(field, format!("unknown category '{}'", label.trim()));
                    0
                }
            },
            None => {
                let code = self.code(field);
                if !table.is_empty() && !table.contains_code(code) {
                    self.warnings.push(format!(
                        "{} code {} is not in the configured table.",
                        field, code
                    ));
                }
                code
            }
        }
    }
}

/// Accepts JSON numbers and numeric strings with grouping separators
/// ("5,00,000", "1_000") or a leading rupee sign.
fn parse_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => return parse_text(s),
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn parse_text(s: &str) -> Option<f64> {
    let cleaned: String = s
        .trim()
        .trim_start_matches('₹')
        .chars()
        .filter(|c| !matches!(c, ',' | '_' | ' '))
        .collect();
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::applicant::categories::CategoryEntry;
    use serde_json::json;

    fn table(entries: &[(&str, u8)]) -> CategoryTable {
        CategoryTable::new(
            entries
                .iter()
                .map(|(label, code)| CategoryEntry {
                    label: label.to_string(),
                    code: *code,
                    aliases: vec![],
                })
                .collect(),
        )
    }

    fn employment() -> CategoryTable {
        table(&[
            ("Govt", 4),
            ("Salaried", 3),
            ("Self-Employed", 2),
            ("Pensioner", 1),
            ("Other", 0),
            ("Unemployed", 5),
        ])
    }

    fn location() -> CategoryTable {
        table(&[("Rural", 1), ("Semi-Urban", 2), ("Urban", 3)])
    }

    fn full_form() -> FormSubmission {
        serde_json::from_value(json!({
            "employment_type": "Salaried",
            "current_employment_years": 5,
            "total_employment_years": "10",
            "sbi_customer": "Yes",
            "location_type": "Urban",
            "dependants": 2,
            "income": "5,00,000",
            "other_amis": 100000,
            "loan_amount": "200000",
            "loan_tenure": 5,
            "cibil_rank": 7,
            "cibil_score": 750,
            "dpd": 0,
            "max_dpd": 0,
            "missed_emis": 0
        }))
        .unwrap()
    }

    #[test]
    fn test_full_form_parses_without_warnings() {
        let parsed = ApplicantInput::from_form(&full_form(), &employment(), &location());
        assert!(parsed.warnings.is_empty(), "{:?}", parsed.warnings);
        let input = parsed.input;
        assert_eq!(input.employment_type, 3);
        assert_eq!(input.location_type, 3);
        assert!(input.sbi_customer);
        assert_eq!(input.income, 500_000.0);
        assert_eq!(input.loan_amount, 200_000.0);
        assert_eq!(input.total_employment_years, 10);
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let parsed = ApplicantInput::from_form(&FormSubmission::new(), &employment(), &location());
        assert_eq!(parsed.input, ApplicantInput::default());
        assert_eq!(parsed.warnings.len(), FORM_FIELDS.len());
        assert!(parsed.warnings.iter().all(|w| w.contains("defaulted to 0")));
    }

    #[test]
    fn test_unparseable_number_defaults_with_warning() {
        let form = full_form().with("income", "five lakh");
        let parsed = ApplicantInput::from_form(&form, &employment(), &location());
        assert_eq!(parsed.input.income, 0.0);
        assert_eq!(parsed.warnings.len(), 1);
        assert!(parsed.warnings[0].contains("income"));
    }

    #[test]
    fn test_fractional_count_is_rejected() {
        let form = full_form().with("dependants", 2.5);
        let parsed = ApplicantInput::from_form(&form, &employment(), &location());
        assert_eq!(parsed.input.dependants, 0);
        assert!(parsed.warnings[0].contains("dependants"));
    }

    #[test]
    fn test_negative_amount_is_rejected() {
        let form = full_form().with("other_amis", -10);
        let parsed = ApplicantInput::from_form(&form, &employment(), &location());
        assert_eq!(parsed.input.other_amis, 0.0);
        assert!(parsed.warnings[0].contains("negative"));
    }

    #[test]
    fn test_numeric_category_code_passes_through() {
        let form = full_form().with("employment_type", 4);
        let parsed = ApplicantInput::from_form(&form, &employment(), &location());
        assert_eq!(parsed.input.employment_type, 4);
        assert!(parsed.warnings.is_empty());

        let form = full_form().with("location_type", "2");
        let parsed = ApplicantInput::from_form(&form, &employment(), &location());
        assert_eq!(parsed.input.location_type, 2);
    }

    #[test]
    fn test_code_outside_table_is_kept_but_flagged() {
        let form = full_form().with("location_type", 7);
        let parsed = ApplicantInput::from_form(&form, &employment(), &location());
        assert_eq!(parsed.input.location_type, 7);
        assert!(parsed.warnings[0].contains("not in the configured table"));
    }

    #[test]
    fn test_unknown_category_label() {
        let form = full_form().with("employment_type", "Freelancer");
        let parsed = ApplicantInput::from_form(&form, &employment(), &location());
        assert_eq!(parsed.input.employment_type, 0);
        assert!(parsed.warnings[0].contains("Freelancer"));
    }

    #[test]
    fn test_labels_fail_without_a_table() {
        let parsed =
            ApplicantInput::from_form(&full_form(), &CategoryTable::default(), &location());
        assert_eq!(parsed.input.employment_type, 0);
        assert_eq!(parsed.warnings.len(), 1);
    }

    #[test]
    fn test_flag_spellings() {
        for (raw, expected) in [(json!("no"), false), (json!(1), true), (json!(true), true)] {
            let form = full_form().with("sbi_customer", raw);
            let parsed = ApplicantInput::from_form(&form, &employment(), &location());
            assert_eq!(parsed.input.sbi_customer, expected);
            assert!(parsed.warnings.is_empty());
        }
        let form = full_form().with("sbi_customer", "maybe");
        let parsed = ApplicantInput::from_form(&form, &employment(), &location());
        assert!(!parsed.input.sbi_customer);
        assert_eq!(parsed.warnings.len(), 1);
    }

    #[test]
    fn test_unknown_field_is_reported() {
        let form = full_form().with("favourite_colour", "red");
        let parsed = ApplicantInput::from_form(&form, &employment(), &location());
        assert!(parsed.warnings[0].contains("favourite_colour"));
    }

    #[test]
    fn test_parse_number_variants() {
        assert_eq!(parse_number(&json!("₹ 1,00,000")), Some(100_000.0));
        assert_eq!(parse_number(&json!("1_000.5")), Some(1000.5));
        assert_eq!(parse_number(&json!(true)), None);
        assert_eq!(parse_number(&json!("NaN")), None);
    }
}
