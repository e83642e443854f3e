use serde::{Deserialize, Serialize};

use crate::applicant::ApplicantInput;
use crate::types::{Money, Ratio};

/// Where the applicant's annual income goes once the loan is granted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IncomeBreakdown {
    pub net_income: Money,
    pub loan_amount: Money,
    pub other_amis: Money,
    /// Shares of gross income; 0 when income is 0. The net share is negative
    /// when obligations exceed income.
    pub net_income_share: Ratio,
    pub loan_amount_share: Ratio,
    pub other_amis_share: Ratio,
}

pub fn income_breakdown(input: &ApplicantInput) -> IncomeBreakdown {
    let net_income = input.income - input.total_obligations();
    let share = |amount: Money| {
        if input.income == 0.0 {
            0.0
        } else {
            amount / input.income
        }
    };

    IncomeBreakdown {
        net_income,
        loan_amount: input.loan_amount,
        other_amis: input.other_amis,
        net_income_share: share(net_income),
        loan_amount_share: share(input.loan_amount),
        other_amis_share: share(input.other_amis),
    }
}
