use serde::{Deserialize, Serialize};

use super::super::domain::{Customer, Loan, LoanTerms};
use super::super::repayment::{monthly_repayment_with_periods, RepaymentError};
use super::config::EligibilityConfig;

/// Closed result of an eligibility check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EligibilityOutcome {
    Approved {
        interest_rate: f64,
        corrected_interest_rate: f64,
        tenure: u32,
        monthly_repayment: f64,
    },
    Rejected {
        reason: RejectionReason,
    },
    CustomerNotFound,
}

impl EligibilityOutcome {
    pub fn is_approved(&self) -> bool {
        matches!(self, EligibilityOutcome::Approved { .. })
    }

    pub fn summary(&self) -> String {
        match self {
            EligibilityOutcome::Approved {
                corrected_interest_rate,
                monthly_repayment,
                ..
            } => format!(
                "approved at {corrected_interest_rate:.2}% with monthly repayment {monthly_repayment:.2}"
            ),
            EligibilityOutcome::Rejected { reason } => reason.summary(),
            EligibilityOutcome::CustomerNotFound => "Customer not found".to_string(),
        }
    }
}

/// Reasons a loan request is turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    LowCreditScore,
    HighExistingEmis,
}

impl RejectionReason {
    pub const fn label(self) -> &'static str {
        match self {
            RejectionReason::LowCreditScore => "low credit score",
            RejectionReason::HighExistingEmis => "high existing EMIs",
        }
    }

    pub fn summary(self) -> String {
        format!("Loan not approved due to {}.", self.label())
    }
}

/// Interest ceiling for a score, or `None` when the score is too low to lend against.
pub fn ceiling_for(score: f64, config: &EligibilityConfig) -> Option<f64> {
    config
        .rate_tiers
        .iter()
        .find(|tier| score > tier.score_above)
        .map(|tier| tier.interest_ceiling)
}

/// Sum of installments on loans currently marked approved.
pub fn existing_emis(history: &[Loan]) -> f64 {
    history
        .iter()
        .filter(|loan| loan.loan_approved)
        .map(|loan| loan.monthly_repayment)
        .sum()
}

pub(crate) fn decide_outcome(
    customer: &Customer,
    history: &[Loan],
    terms: &LoanTerms,
    score: f64,
    config: &EligibilityConfig,
) -> Result<EligibilityOutcome, RepaymentError> {
    let Some(ceiling) = ceiling_for(score, config) else {
        return Ok(EligibilityOutcome::Rejected {
            reason: RejectionReason::LowCreditScore,
        });
    };
    let corrected_interest_rate = terms.interest_rate.min(ceiling);

    // Only loans already on the books count; the requested loan's EMI is not added.
    let emi_allowance = config.max_emi_to_income_ratio * customer.monthly_income as f64;
    if existing_emis(history) > emi_allowance {
        return Ok(EligibilityOutcome::Rejected {
            reason: RejectionReason::HighExistingEmis,
        });
    }

    let monthly_repayment = monthly_repayment_with_periods(
        terms.loan_amount,
        corrected_interest_rate,
        terms.tenure,
        config.compounding_periods_per_year,
    )?;

    Ok(EligibilityOutcome::Approved {
        interest_rate: terms.interest_rate,
        corrected_interest_rate,
        tenure: terms.tenure,
        monthly_repayment,
    })
}
