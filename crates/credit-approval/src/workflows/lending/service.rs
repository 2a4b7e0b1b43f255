use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::domain::{
    Customer, CustomerId, CustomerRegistration, LoanApplication, LoanDraft, LoanId, LoanTerms,
};
use super::evaluation::{EligibilityConfig, EligibilityEngine, EligibilityOutcome, RejectionReason};
use super::repayment::RepaymentError;
use super::repository::{
    CustomerLoanView, CustomerRepository, LoanDetailView, LoanFilter, LoanRepository,
    RepositoryError,
};
use super::validation::{end_date_for, RequestGuard, ValidationError};

/// Result of a loan origination attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LoanCreationOutcome {
    Created {
        loan_id: LoanId,
        customer_id: CustomerId,
        monthly_repayment: f64,
    },
    Rejected {
        reason: RejectionReason,
    },
    CustomerNotFound,
}

/// Service composing request validation, the record store, and the eligibility engine.
///
/// Eligibility reads and the loan write are separate store calls; two concurrent
/// originations for one customer can both pass the debt-ratio check.
pub struct LendingService<C, L> {
    guard: RequestGuard,
    customers: Arc<C>,
    loans: Arc<L>,
    engine: EligibilityEngine,
}

impl<C, L> LendingService<C, L>
where
    C: CustomerRepository + 'static,
    L: LoanRepository + 'static,
{
    pub fn new(customers: Arc<C>, loans: Arc<L>, config: EligibilityConfig) -> Self {
        Self {
            guard: RequestGuard,
            customers,
            loans,
            engine: EligibilityEngine::new(config),
        }
    }

    /// Register a new customer with an approved limit derived from income.
    pub fn register_customer(
        &self,
        registration: CustomerRegistration,
    ) -> Result<Customer, LendingServiceError> {
        let draft = self.guard.customer_from_registration(registration)?;
        let customer = self.customers.insert(draft)?;

        info!(
            customer_id = %customer.customer_id,
            approved_limit = customer.approved_limit,
            "customer registered"
        );
        Ok(customer)
    }

    /// Run the eligibility engine against the customer's current loan history.
    pub fn check_eligibility(
        &self,
        application: LoanApplication,
        today: NaiveDate,
    ) -> Result<EligibilityOutcome, LendingServiceError> {
        let terms = self.guard.terms_from_application(application, today)?;
        self.eligibility_for(&terms, today)
    }

    /// Check eligibility and, when approved, persist exactly one new loan.
    pub fn create_loan(
        &self,
        application: LoanApplication,
        today: NaiveDate,
    ) -> Result<LoanCreationOutcome, LendingServiceError> {
        let terms = self.guard.terms_from_application(application, today)?;

        let (corrected_interest_rate, monthly_repayment) =
            match self.eligibility_for(&terms, today)? {
                EligibilityOutcome::Approved {
                    corrected_interest_rate,
                    monthly_repayment,
                    ..
                } => (corrected_interest_rate, monthly_repayment),
                EligibilityOutcome::Rejected { reason } => {
                    return Ok(LoanCreationOutcome::Rejected { reason })
                }
                EligibilityOutcome::CustomerNotFound => {
                    return Ok(LoanCreationOutcome::CustomerNotFound)
                }
            };

        let end_date = end_date_for(today, terms.tenure)?;
        let loan = self.loans.insert(LoanDraft {
            customer_id: terms.customer_id,
            loan_amount: terms.loan_amount,
            tenure: terms.tenure,
            interest_rate: corrected_interest_rate,
            monthly_repayment,
            emis_paid_on_time: 0,
            date_of_approval: today,
            end_date,
            loan_approved: true,
        })?;

        info!(
            loan_id = %loan.loan_id,
            customer_id = %loan.customer_id,
            monthly_repayment = loan.monthly_repayment,
            "loan created"
        );

        Ok(LoanCreationOutcome::Created {
            loan_id: loan.loan_id,
            customer_id: loan.customer_id,
            monthly_repayment: loan.monthly_repayment,
        })
    }

    /// Fetch a loan joined with its owner.
    pub fn view_loan(&self, loan_id: LoanId) -> Result<LoanDetailView, LendingServiceError> {
        let loan = self
            .loans
            .fetch(loan_id)?
            .ok_or(RepositoryError::NotFound)?;
        let customer = self
            .customers
            .fetch(loan.customer_id)?
            .ok_or(RepositoryError::NotFound)?;

        Ok(LoanDetailView::new(&loan, &customer))
    }

    /// List every loan held by a customer.
    pub fn view_customer_loans(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<CustomerLoanView>, LendingServiceError> {
        self.customers
            .fetch(customer_id)?
            .ok_or(RepositoryError::NotFound)?;

        let mut loans = self
            .loans
            .list_for_customer(customer_id, LoanFilter::default())?;
        loans.sort_by_key(|loan| loan.loan_id);

        Ok(loans.iter().map(CustomerLoanView::from).collect())
    }

    fn eligibility_for(
        &self,
        terms: &LoanTerms,
        today: NaiveDate,
    ) -> Result<EligibilityOutcome, LendingServiceError> {
        let customer = self.customers.fetch(terms.customer_id)?;
        let history = match &customer {
            Some(customer) => self
                .loans
                .list_for_customer(customer.customer_id, LoanFilter::default())?,
            None => Vec::new(),
        };

        let decision = self
            .engine
            .decide(customer.as_ref(), &history, terms, today)?;

        if let Some(score) = &decision.score {
            debug!(
                customer_id = %terms.customer_id,
                history = history.len(),
                score = score.total,
                components = ?score.components,
                outcome = %decision.outcome.summary(),
                "eligibility evaluated"
            );
        } else {
            debug!(customer_id = %terms.customer_id, "eligibility evaluated for unknown customer");
        }
        Ok(decision.outcome)
    }
}

/// Error raised by the lending service.
#[derive(Debug, thiserror::Error)]
pub enum LendingServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Computation(#[from] RepaymentError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
