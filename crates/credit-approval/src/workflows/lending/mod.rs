//! Customer registration, credit scoring, eligibility, and loan origination.
//!
//! Scoring and eligibility are pure functions over a customer snapshot and its loan history;
//! the service facade performs the record-store reads and the single write around them.

pub mod domain;
pub mod evaluation;
pub mod repayment;
pub mod repository;
pub mod router;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    approved_limit_for, Customer, CustomerDraft, CustomerId, CustomerRegistration, Loan,
    LoanApplication, LoanDraft, LoanId, LoanTerms,
};
pub use evaluation::{
    CreditScore, EligibilityConfig, EligibilityDecision, EligibilityEngine, EligibilityOutcome,
    RejectionReason,
};
pub use repayment::{monthly_repayment, monthly_repayment_with_periods, RepaymentError};
pub use repository::{
    CustomerLoanView, CustomerRepository, CustomerView, LoanDetailView, LoanFilter,
    LoanRepository, RepositoryError,
};
pub use router::lending_router;
pub use service::{LendingService, LendingServiceError, LoanCreationOutcome};
pub use validation::ValidationError;
