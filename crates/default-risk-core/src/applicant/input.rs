use serde::{Deserialize, Serialize};

use crate::types::Money;

/// Lowest and highest CIBIL bureau scores.
pub const CIBIL_SCORE_RANGE: (u32, u32) = (300, 900);

/// CIBIL ranking buckets run from 1 (300+) to 10 (850+).
pub const CIBIL_RANK_RANGE: (u8, u8) = (1, 10);

// ---------------------------------------------------------------------------
// Input type
// ---------------------------------------------------------------------------

/// A fully populated applicant record. Every field is required; callers
/// working from raw form values go through [`crate::applicant::form`], which
/// substitutes 0 for anything missing or unparseable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicantInput {
    /// Employment category code, resolved through the employment table.
    pub employment_type: u8,
    /// Years with the current employer.
    pub current_employment_years: u32,
    /// Total years in employment.
    pub total_employment_years: u32,
    /// Existing SBI customer.
    pub sbi_customer: bool,
    /// Location category code, resolved through the location table.
    pub location_type: u8,
    /// Number of dependants, normally at least 1.
    pub dependants: u32,
    /// Annual income after tax.
    pub income: Money,
    /// Annual installments on other loans.
    pub other_amis: Money,
    /// Requested loan amount per year.
    pub loan_amount: Money,
    /// Loan tenure in years.
    pub loan_tenure: u32,
    /// CIBIL ranking bucket, 1 to 10.
    pub cibil_rank: u8,
    /// CIBIL score, 300 to 900.
    pub cibil_score: u32,
    /// Current days past due.
    pub dpd: u32,
    /// Worst days past due on record.
    pub max_dpd: u32,
    /// Installments missed so far.
    pub missed_emis: u32,
}

impl ApplicantInput {
    /// Total annual installment burden once the requested loan is granted.
    pub fn total_obligations(&self) -> Money {
        self.other_amis + self.loan_amount
    }

    /// Domain checks that never block a calculation. Each violated bound is
    /// reported as a human-readable warning.
    pub fn range_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.income <= 0.0 {
            warnings.push("Income is non-positive; income ratios evaluate to 0.".into());
        }
        if self.other_amis < 0.0 {
            warnings.push("Other AMIs are negative.".into());
        }
        if self.loan_amount < 0.0 {
            warnings.push("Loan amount is negative.".into());
        }
        if self.dependants == 0 {
            warnings.push("Dependants is 0; surplus per dependant evaluates to 0.".into());
        }
        if self.loan_tenure == 0 {
            warnings.push("Loan tenure is 0; missed EMI rate evaluates to 0.".into());
        }
        if self.cibil_rank < CIBIL_RANK_RANGE.0 || self.cibil_rank > CIBIL_RANK_RANGE.1 {
            warnings.push(format!(
                "CIBIL rank {} is outside {}-{}.",
                self.cibil_rank, CIBIL_RANK_RANGE.0, CIBIL_RANK_RANGE.1
            ));
        }
        if self.cibil_score < CIBIL_SCORE_RANGE.0 || self.cibil_score > CIBIL_SCORE_RANGE.1 {
            warnings.push(format!(
                "CIBIL score {} is outside {}-{}.",
                self.cibil_score, CIBIL_SCORE_RANGE.0, CIBIL_SCORE_RANGE.1
            ));
        }
        if self.max_dpd < self.dpd {
            warnings.push(format!(
                "Max DPD ({}) is below current DPD ({}).",
                self.max_dpd, self.dpd
            ));
        }
        if self.current_employment_years > self.total_employment_years {
            warnings.push("Current employment length exceeds total employment length.".into());
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ApplicantInput {
        ApplicantInput {
            employment_type: 3,
            current_employment_years: 5,
            total_employment_years: 10,
            sbi_customer: false,
            location_type: 3,
            dependants: 2,
            income: 500_000.0,
            other_amis: 100_000.0,
            loan_amount: 200_000.0,
            loan_tenure: 5,
            cibil_rank: 7,
            cibil_score: 750,
            dpd: 0,
            max_dpd: 0,
            missed_emis: 0,
        }
    }

    #[test]
    fn test_total_obligations() {
        assert_eq!(sample().total_obligations(), 300_000.0);
    }

    #[test]
    fn test_clean_applicant_has_no_warnings() {
        assert!(sample().range_warnings().is_empty());
    }

    #[test]
    fn test_zero_denominators_are_flagged() {
        let input = ApplicantInput {
            income: 0.0,
            dependants: 0,
            loan_tenure: 0,
            ..sample()
        };
        let warnings = input.range_warnings();
        assert!(warnings.iter().any(|w| w.contains("Income")));
        assert!(warnings.iter().any(|w| w.contains("Dependants")));
        assert!(warnings.iter().any(|w| w.contains("tenure")));
    }

    #[test]
    fn test_bureau_bounds_are_flagged() {
        let input = ApplicantInput {
            cibil_rank: 11,
            cibil_score: 250,
            ..sample()
        };
        let warnings = input.range_warnings();
        assert!(warnings.iter().any(|w| w.contains("CIBIL rank 11")));
        assert!(warnings.iter().any(|w| w.contains("CIBIL score 250")));
    }

    #[test]
    fn test_max_dpd_below_dpd_is_flagged() {
        let input = ApplicantInput {
            dpd: 90,
            max_dpd: 30,
            ..sample()
        };
        assert!(input.range_warnings().iter().any(|w| w.contains("Max DPD")));
    }

    #[test]
    fn test_deserialize_rejects_missing_field() {
        let json = r#"{"employment_type": 3, "income": 1000.0}"#;
        assert!(serde_json::from_str::<ApplicantInput>(json).is_err());
    }
}
