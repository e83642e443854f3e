//! Column layout of the scoring record.
//!
//! The classifier was trained on a fixed set of named columns in a fixed
//! order. That layout is an external contract, so it is supplied as
//! configuration: each column pairs the verbatim training label with the
//! record field that feeds it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::applicant::ApplicantInput;
use crate::error::RiskError;
use crate::features::DerivedFeatures;
use crate::RiskResult;

/// Every value the calculator can place in a scoring record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureField {
    EmploymentType,
    CurrentEmploymentYears,
    TotalEmploymentYears,
    SbiCustomer,
    LocationType,
    Dependants,
    Income,
    OtherAmis,
    LoanAmount,
    LoanTenure,
    CibilRank,
    CibilScore,
    Dpd,
    MaxDpd,
    MissedEmis,
    EmiToIncome,
    NetDisposableIncome,
    MissedEmiRate,
    DebtToIncomePct,
    SurplusPerDependantMonth,
}

impl FeatureField {
    pub const ALL: [FeatureField; 20] = [
        FeatureField::EmploymentType,
        FeatureField::CurrentEmploymentYears,
        FeatureField::TotalEmploymentYears,
        FeatureField::SbiCustomer,
        FeatureField::LocationType,
        FeatureField::Dependants,
        FeatureField::Income,
        FeatureField::OtherAmis,
        FeatureField::LoanAmount,
        FeatureField::LoanTenure,
        FeatureField::CibilRank,
        FeatureField::CibilScore,
        FeatureField::Dpd,
        FeatureField::MaxDpd,
        FeatureField::MissedEmis,
        FeatureField::EmiToIncome,
        FeatureField::NetDisposableIncome,
        FeatureField::MissedEmiRate,
        FeatureField::DebtToIncomePct,
        FeatureField::SurplusPerDependantMonth,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureField::EmploymentType => "employment_type",
            FeatureField::CurrentEmploymentYears => "current_employment_years",
            FeatureField::TotalEmploymentYears => "total_employment_years",
            FeatureField::SbiCustomer => "sbi_customer",
            FeatureField::LocationType => "location_type",
            FeatureField::Dependants => "dependants",
            FeatureField::Income => "income",
            FeatureField::OtherAmis => "other_amis",
            FeatureField::LoanAmount => "loan_amount",
            FeatureField::LoanTenure => "loan_tenure",
            FeatureField::CibilRank => "cibil_rank",
            FeatureField::CibilScore => "cibil_score",
            FeatureField::Dpd => "dpd",
            FeatureField::MaxDpd => "max_dpd",
            FeatureField::MissedEmis => "missed_emis",
            FeatureField::EmiToIncome => "emi_to_income",
            FeatureField::NetDisposableIncome => "net_disposable_income",
            FeatureField::MissedEmiRate => "missed_emi_rate",
            FeatureField::DebtToIncomePct => "debt_to_income_pct",
            FeatureField::SurplusPerDependantMonth => "surplus_per_dependant_month",
        }
    }

    /// True for the five engineered ratios.
    pub fn is_derived(&self) -> bool {
        matches!(
            self,
            FeatureField::EmiToIncome
                | FeatureField::NetDisposableIncome
                | FeatureField::MissedEmiRate
                | FeatureField::DebtToIncomePct
                | FeatureField::SurplusPerDependantMonth
        )
    }

    /// The numeric value this field contributes to a record. Booleans are 1/0.
    pub fn value(&self, input: &ApplicantInput, features: &DerivedFeatures) -> f64 {
        match self {
            FeatureField::EmploymentType => input.employment_type as f64,
            FeatureField::CurrentEmploymentYears => input.current_employment_years as f64,
            FeatureField::TotalEmploymentYears => input.total_employment_years as f64,
            FeatureField::SbiCustomer => {
                if input.sbi_customer {
                    1.0
                } else {
                    0.0
                }
            }
            FeatureField::LocationType => input.location_type as f64,
            FeatureField::Dependants => input.dependants as f64,
            FeatureField::Income => input.income,
            FeatureField::OtherAmis => input.other_amis,
            FeatureField::LoanAmount => input.loan_amount,
            FeatureField::LoanTenure => input.loan_tenure as f64,
            FeatureField::CibilRank => input.cibil_rank as f64,
            FeatureField::CibilScore => input.cibil_score as f64,
            FeatureField::Dpd => input.dpd as f64,
            FeatureField::MaxDpd => input.max_dpd as f64,
            FeatureField::MissedEmis => input.missed_emis as f64,
            FeatureField::EmiToIncome => features.emi_to_income,
            FeatureField::NetDisposableIncome => features.net_disposable_income,
            FeatureField::MissedEmiRate => features.missed_emi_rate,
            FeatureField::DebtToIncomePct => features.debt_to_income_pct,
            FeatureField::SurplusPerDependantMonth => features.surplus_per_dependant_month,
        }
    }
}

impl fmt::Display for FeatureField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FeatureField {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FeatureField::ALL
            .iter()
            .find(|f| f.as_str() == s.trim())
            .copied()
            .ok_or_else(|| RiskError::InvalidInput {
                field: "field".into(),
                reason: format!("'{}' is not a record field", s),
            })
    }
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// One named column and the record field that feeds it.
///
/// `field` is kept as text so that a schema naming something the calculator
/// cannot produce is reported as a mismatch instead of failing to load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaColumn {
    pub name: String,
    pub field: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub columns: Vec<SchemaColumn>,
}

impl FeatureSchema {
    pub fn new(columns: Vec<SchemaColumn>) -> Self {
        Self { columns }
    }

    /// Column names in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Resolve every column to its source field, in schema order.
    ///
    /// The column set must cover exactly the record fields: a column whose
    /// field is unknown is reported under `missing`, a record field no column
    /// consumes under `unexpected`. Repeated names or fields are rejected.
    pub fn resolve(&self) -> RiskResult<Vec<FeatureField>> {
        if self.columns.is_empty() {
            return Err(RiskError::SchemaMismatch {
                missing: Vec::new(),
                unexpected: FeatureField::ALL.iter().map(|f| f.to_string()).collect(),
                detail: "schema has no columns".into(),
            });
        }

        let mut names: Vec<&str> = Vec::with_capacity(self.columns.len());
        let mut fields: Vec<FeatureField> = Vec::with_capacity(self.columns.len());
        let mut missing: Vec<String> = Vec::new();

        for column in &self.columns {
            let name = column.name.trim();
            if name.is_empty() {
                return Err(RiskError::schema_mismatch(format!(
                    "column for field '{}' has an empty name",
                    column.field
                )));
            }
            if names.contains(&name) {
                return Err(RiskError::schema_mismatch(format!(
                    "column '{}' appears more than once",
                    name
                )));
            }
            names.push(name);

            match column.field.parse::<FeatureField>() {
                Ok(field) if fields.contains(&field) => {
                    return Err(RiskError::schema_mismatch(format!(
                        "field '{}' feeds more than one column",
                        field
                    )));
                }
                Ok(field) => fields.push(field),
                Err(_) => missing.push(format!("{} ({})", name, column.field)),
            }
        }

        let unexpected: Vec<String> = FeatureField::ALL
            .iter()
            .filter(|f| !fields.contains(*f))
            .map(|f| f.to_string())
            .collect();

        if !missing.is_empty() || !unexpected.is_empty() {
            return Err(RiskError::SchemaMismatch {
                missing,
                unexpected,
                detail: "schema columns do not match the record fields".into(),
            });
        }

        Ok(fields)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
