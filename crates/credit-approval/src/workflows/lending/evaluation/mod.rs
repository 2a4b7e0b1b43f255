mod config;
mod policy;
mod rules;

pub use config::{EligibilityConfig, RateTier};
pub use policy::{ceiling_for, existing_emis, EligibilityOutcome, RejectionReason};
pub use rules::{CreditScore, ScoreComponent, ScoreFactor};

use chrono::NaiveDate;

use super::domain::{Customer, Loan, LoanTerms};
use super::repayment::RepaymentError;
use policy::decide_outcome;

/// Outcome together with the score that produced it. The score is absent when the customer
/// does not exist.
#[derive(Debug, Clone, PartialEq)]
pub struct EligibilityDecision {
    pub score: Option<CreditScore>,
    pub outcome: EligibilityOutcome,
}

/// Stateless evaluator applying the rate tiers and debt ratio to a customer snapshot.
pub struct EligibilityEngine {
    config: EligibilityConfig,
}

impl EligibilityEngine {
    pub fn new(config: EligibilityConfig) -> Self {
        Self { config }
    }

    pub fn score(&self, history: &[Loan], today: NaiveDate) -> CreditScore {
        rules::score_history(history, today)
    }

    /// Decide eligibility over an already-fetched customer and loan history.
    ///
    /// `history` must hold every loan of the customer; approved-only filtering for the
    /// debt ratio happens here.
    pub fn evaluate(
        &self,
        customer: Option<&Customer>,
        history: &[Loan],
        terms: &LoanTerms,
        today: NaiveDate,
    ) -> Result<EligibilityOutcome, RepaymentError> {
        self.decide(customer, history, terms, today)
            .map(|decision| decision.outcome)
    }

    /// Same as [`EligibilityEngine::evaluate`], keeping the score breakdown.
    pub fn decide(
        &self,
        customer: Option<&Customer>,
        history: &[Loan],
        terms: &LoanTerms,
        today: NaiveDate,
    ) -> Result<EligibilityDecision, RepaymentError> {
        let Some(customer) = customer else {
            return Ok(EligibilityDecision {
                score: None,
                outcome: EligibilityOutcome::CustomerNotFound,
            });
        };

        let score = self.score(history, today);
        let outcome = decide_outcome(customer, history, terms, score.total, &self.config)?;
        Ok(EligibilityDecision {
            score: Some(score),
            outcome,
        })
    }
}

impl Default for EligibilityEngine {
    fn default() -> Self {
        Self::new(EligibilityConfig::standard())
    }
}
