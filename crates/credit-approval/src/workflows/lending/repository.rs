use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{Customer, CustomerDraft, CustomerId, Loan, LoanDraft, LoanId};

/// Storage abstraction for customers so the service can be exercised in isolation.
pub trait CustomerRepository: Send + Sync {
    /// Persist a new customer, assigning the next identifier.
    fn insert(&self, draft: CustomerDraft) -> Result<Customer, RepositoryError>;
    /// Create or replace a customer keyed by its existing identifier. Returns `true` when created.
    ///
    /// Stores may refuse with `RepositoryError::Conflict` when the identifier belongs to a record
    /// created through `insert`.
    fn upsert(&self, customer: Customer) -> Result<bool, RepositoryError>;
    fn fetch(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError>;
}

/// Storage abstraction for loans.
pub trait LoanRepository: Send + Sync {
    fn insert(&self, draft: LoanDraft) -> Result<Loan, RepositoryError>;
    /// Same contract as `CustomerRepository::upsert`.
    fn upsert(&self, loan: Loan) -> Result<bool, RepositoryError>;
    fn fetch(&self, id: LoanId) -> Result<Option<Loan>, RepositoryError>;
    fn list_for_customer(
        &self,
        customer_id: CustomerId,
        filter: LoanFilter,
    ) -> Result<Vec<Loan>, RepositoryError>;
}

/// Optional field filters applied when listing a customer's loans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoanFilter {
    pub approved: Option<bool>,
}

impl LoanFilter {
    pub fn approved_only() -> Self {
        Self {
            approved: Some(true),
        }
    }

    pub fn matches(&self, loan: &Loan) -> bool {
        self.approved
            .map_or(true, |approved| loan.loan_approved == approved)
    }
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Customer fields exposed on registration and alongside a loan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerView {
    pub customer_id: CustomerId,
    pub name: String,
    pub age: u8,
    pub monthly_income: u64,
    pub approved_limit: u64,
    pub phone_number: String,
}

impl From<&Customer> for CustomerView {
    fn from(customer: &Customer) -> Self {
        Self {
            customer_id: customer.customer_id,
            name: customer.full_name(),
            age: customer.age,
            monthly_income: customer.monthly_income,
            approved_limit: customer.approved_limit,
            phone_number: customer.phone_number.clone(),
        }
    }
}

/// Single loan joined with its owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanDetailView {
    pub loan_id: LoanId,
    pub loan_amount: f64,
    pub interest_rate: f64,
    pub tenure: u32,
    pub monthly_repayment: f64,
    pub emis_paid_on_time: u32,
    pub date_of_approval: NaiveDate,
    pub end_date: NaiveDate,
    pub loan_approved: bool,
    pub customer: CustomerView,
}

impl LoanDetailView {
    pub fn new(loan: &Loan, customer: &Customer) -> Self {
        Self {
            loan_id: loan.loan_id,
            loan_amount: loan.loan_amount,
            interest_rate: loan.interest_rate,
            tenure: loan.tenure,
            monthly_repayment: loan.monthly_repayment,
            emis_paid_on_time: loan.emis_paid_on_time,
            date_of_approval: loan.date_of_approval,
            end_date: loan.end_date,
            loan_approved: loan.loan_approved,
            customer: CustomerView::from(customer),
        }
    }
}

/// Row of a customer's loan listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerLoanView {
    pub loan_id: LoanId,
    pub loan_amount: f64,
    pub interest_rate: f64,
    pub monthly_installment: f64,
    pub repayments_left: u32,
}

impl From<&Loan> for CustomerLoanView {
    fn from(loan: &Loan) -> Self {
        Self {
            loan_id: loan.loan_id,
            loan_amount: loan.loan_amount,
            interest_rate: loan.interest_rate,
            monthly_installment: loan.monthly_repayment,
            repayments_left: loan.repayments_left(),
        }
    }
}
