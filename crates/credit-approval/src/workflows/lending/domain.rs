use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for registered customers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(pub u64);

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier wrapper for originated or ingested loans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoanId(pub u64);

impl fmt::Display for LoanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stored customer. The approved limit is fixed at registration (or taken verbatim from ingestion).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub age: u8,
    pub monthly_income: u64,
    pub approved_limit: u64,
    pub phone_number: String,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Customer fields prior to the store assigning an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDraft {
    pub first_name: String,
    pub last_name: String,
    pub age: u8,
    pub monthly_income: u64,
    pub approved_limit: u64,
    pub phone_number: String,
}

impl CustomerDraft {
    pub fn with_id(self, customer_id: CustomerId) -> Customer {
        Customer {
            customer_id,
            first_name: self.first_name,
            last_name: self.last_name,
            age: self.age,
            monthly_income: self.monthly_income,
            approved_limit: self.approved_limit,
            phone_number: self.phone_number,
        }
    }
}

/// Stored loan record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub loan_id: LoanId,
    pub customer_id: CustomerId,
    pub loan_amount: f64,
    pub tenure: u32,
    pub interest_rate: f64,
    pub monthly_repayment: f64,
    pub emis_paid_on_time: u32,
    pub date_of_approval: NaiveDate,
    pub end_date: NaiveDate,
    pub loan_approved: bool,
}

impl Loan {
    /// A loan counts toward the on-time signal once any EMI was paid on time.
    pub fn paid_on_time(&self) -> bool {
        self.emis_paid_on_time > 0
    }

    pub fn repayments_left(&self) -> u32 {
        self.tenure.saturating_sub(self.emis_paid_on_time)
    }
}

/// Loan fields prior to the store assigning an identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanDraft {
    pub customer_id: CustomerId,
    pub loan_amount: f64,
    pub tenure: u32,
    pub interest_rate: f64,
    pub monthly_repayment: f64,
    pub emis_paid_on_time: u32,
    pub date_of_approval: NaiveDate,
    pub end_date: NaiveDate,
    pub loan_approved: bool,
}

impl LoanDraft {
    pub fn with_id(self, loan_id: LoanId) -> Loan {
        Loan {
            loan_id,
            customer_id: self.customer_id,
            loan_amount: self.loan_amount,
            tenure: self.tenure,
            interest_rate: self.interest_rate,
            monthly_repayment: self.monthly_repayment,
            emis_paid_on_time: self.emis_paid_on_time,
            date_of_approval: self.date_of_approval,
            end_date: self.end_date,
            loan_approved: self.loan_approved,
        }
    }
}

/// Inbound registration payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRegistration {
    pub first_name: String,
    pub last_name: String,
    pub age: u8,
    pub monthly_income: u64,
    pub phone_number: String,
}

/// Inbound payload shared by the eligibility check and loan creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanApplication {
    pub customer_id: CustomerId,
    pub loan_amount: f64,
    pub interest_rate: f64,
    pub tenure: u32,
}

/// Loan terms that passed validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoanTerms {
    pub customer_id: CustomerId,
    pub loan_amount: f64,
    pub interest_rate: f64,
    pub tenure: u32,
}

const APPROVED_LIMIT_INCOME_MULTIPLE: u64 = 36;
const APPROVED_LIMIT_STEP: u64 = 100_000;

/// `36 × monthly_income`, rounded to the nearest 100000 with exact halves going to the even multiple.
pub fn approved_limit_for(monthly_income: u64) -> u64 {
    let raw = monthly_income.saturating_mul(APPROVED_LIMIT_INCOME_MULTIPLE);
    let quotient = raw / APPROVED_LIMIT_STEP;
    let remainder = raw % APPROVED_LIMIT_STEP;
    let half = APPROVED_LIMIT_STEP / 2;

    let rounded = if remainder > half || (remainder == half && quotient % 2 == 1) {
        quotient + 1
    } else {
        quotient
    };

    rounded.saturating_mul(APPROVED_LIMIT_STEP)
}
