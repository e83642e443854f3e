//! Derived affordability and delinquency ratios.
//!
//! Five features are engineered from the applicant record:
//! 1. **EMI to income** -- (other AMIs + loan amount) / income.
//! 2. **Net disposable income** -- income - other AMIs - loan amount.
//! 3. **Missed EMI rate** -- missed EMIs / loan tenure.
//! 4. **Debt-to-income (%)** -- (other AMIs + loan amount) * 100 / income.
//! 5. **Surplus per dependant per month** -- net disposable / (12 * dependants).
//!
//! Any ratio with a zero denominator is exactly 0. Values are plain IEEE
//! doubles with no rounding, so repeated evaluation is bit-identical.

use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::applicant::ApplicantInput;
use crate::types::{with_metadata, ComputationOutput, Money, Ratio};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedFeatures {
    pub emi_to_income: Ratio,
    /// Not clamped; negative when obligations exceed income.
    pub net_disposable_income: Money,
    pub missed_emi_rate: Ratio,
    /// Percentage points (60.0 = 60%).
    pub debt_to_income_pct: f64,
    pub surplus_per_dependant_month: Money,
}

/// Compute the derived features. Pure and total: no errors, no side effects.
pub fn compute_features(input: &ApplicantInput) -> DerivedFeatures {
    let obligations = input.other_amis + input.loan_amount;
    let net_disposable_income = input.income - input.other_amis - input.loan_amount;

    DerivedFeatures {
        emi_to_income: ratio_or_zero(obligations, input.income),
        net_disposable_income,
        missed_emi_rate: ratio_or_zero(input.missed_emis as f64, input.loan_tenure as f64),
        debt_to_income_pct: ratio_or_zero(obligations * 100.0, input.income),
        surplus_per_dependant_month: ratio_or_zero(
            net_disposable_income,
            12.0 * input.dependants as f64,
        ),
    }
}

/// [`compute_features`] wrapped in the standard output envelope, with the
/// applicant's range warnings attached.
pub fn calculate_features(input: &ApplicantInput) -> ComputationOutput<DerivedFeatures> {
    let start = Instant::now();
    let warnings = input.range_warnings();
    let features = compute_features(input);

    tracing::debug!(
        emi_to_income = features.emi_to_income,
        net_disposable_income = features.net_disposable_income,
        "derived features computed"
    );

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Derived affordability ratios (zero denominator => 0)",
        input,
        warnings,
        elapsed,
        features,
    )
}

fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    fn sample() -> ApplicantInput {
        ApplicantInput {
            employment_type: 3,
            current_employment_years: 5,
            total_employment_years: 10,
            sbi_customer: true,
            location_type: 3,
            dependants: 2,
            income: 500_000.0,
            other_amis: 100_000.0,
            loan_amount: 200_000.0,
            loan_tenure: 5,
            cibil_rank: 7,
            cibil_score: 750,
            dpd: 0,
            max_dpd: 30,
            missed_emis: 2,
        }
    }

    #[test]
    fn test_reference_applicant() {
        let f = compute_features(&sample());
        assert_eq!(f.emi_to_income, 0.6);
        assert_eq!(f.debt_to_income_pct, 60.0);
        assert_eq!(f.net_disposable_income, 200_000.0);
        assert!(approx_eq(f.surplus_per_dependant_month, 8333.33, 0.01));
        assert_eq!(f.surplus_per_dependant_month, 200_000.0 / 24.0);
        assert_eq!(f.missed_emi_rate, 0.4);
    }

    #[test]
    fn test_zero_income_ratios_are_zero() {
        let f = compute_features(&ApplicantInput {
            income: 0.0,
            ..sample()
        });
        assert_eq!(f.emi_to_income, 0.0);
        assert_eq!(f.debt_to_income_pct, 0.0);
        assert_eq!(f.net_disposable_income, -300_000.0);
    }

    #[test]
    fn test_zero_dependants_surplus_is_zero() {
        let f = compute_features(&ApplicantInput {
            dependants: 0,
            ..sample()
        });
        assert_eq!(f.surplus_per_dependant_month, 0.0);
    }

    #[test]
    fn test_zero_tenure_missed_rate_is_zero() {
        let f = compute_features(&ApplicantInput {
            loan_tenure: 0,
            missed_emis: 12,
            ..sample()
        });
        assert_eq!(f.missed_emi_rate, 0.0);
    }

    #[test]
    fn test_net_disposable_is_not_clamped() {
        let f = compute_features(&ApplicantInput {
            income: 150_000.0,
            ..sample()
        });
        assert_eq!(f.net_disposable_income, -150_000.0);
        assert_eq!(f.surplus_per_dependant_month, -150_000.0 / 24.0);
        assert_eq!(f.emi_to_income, 2.0);
    }

    #[test]
    fn test_repeat_evaluation_is_bit_identical() {
        let input = ApplicantInput {
            income: 731_117.0,
            other_amis: 12_345.67,
            loan_amount: 98_765.43,
            dependants: 3,
            loan_tenure: 7,
            missed_emis: 5,
            ..sample()
        };
        let a = compute_features(&input);
        let b = compute_features(&input);
        assert_eq!(a.emi_to_income.to_bits(), b.emi_to_income.to_bits());
        assert_eq!(a.net_disposable_income.to_bits(), b.net_disposable_income.to_bits());
        assert_eq!(a.missed_emi_rate.to_bits(), b.missed_emi_rate.to_bits());
        assert_eq!(a.debt_to_income_pct.to_bits(), b.debt_to_income_pct.to_bits());
        assert_eq!(
            a.surplus_per_dependant_month.to_bits(),
            b.surplus_per_dependant_month.to_bits()
        );
    }

    #[test]
    fn test_envelope_carries_range_warnings() {
        let out = calculate_features(&ApplicantInput {
            dependants: 0,
            ..sample()
        });
        assert_eq!(out.result.surplus_per_dependant_month, 0.0);
        assert!(out.warnings.iter().any(|w| w.contains("Dependants")));
        assert_eq!(out.assumptions["income"], 500_000.0);
    }
}
