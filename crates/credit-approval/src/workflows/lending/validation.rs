use chrono::{Months, NaiveDate};

use super::domain::{
    approved_limit_for, CustomerDraft, CustomerRegistration, LoanApplication, LoanTerms,
};

/// Validation errors raised before any scoring or persistence happens.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must not be blank")]
    BlankField { field: &'static str },
    #[error("age must be greater than zero")]
    InvalidAge,
    #[error("loan_amount must be a positive number (found {found})")]
    InvalidLoanAmount { found: f64 },
    #[error("interest_rate must be a non-negative number (found {found})")]
    InvalidInterestRate { found: f64 },
    #[error("tenure must be at least one month")]
    ZeroTenure,
    #[error("tenure of {tenure} months runs past the supported calendar")]
    TenureOutOfRange { tenure: u32 },
    #[error("malformed request: {0}")]
    Malformed(String),
}

/// Guard producing validated drafts and terms from inbound payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestGuard;

impl RequestGuard {
    /// Validate a registration and fix its approved limit.
    pub fn customer_from_registration(
        &self,
        registration: CustomerRegistration,
    ) -> Result<CustomerDraft, ValidationError> {
        let first_name = required(registration.first_name, "first_name")?;
        let last_name = required(registration.last_name, "last_name")?;
        let phone_number = required(registration.phone_number, "phone_number")?;

        if registration.age == 0 {
            return Err(ValidationError::InvalidAge);
        }

        Ok(CustomerDraft {
            first_name,
            last_name,
            age: registration.age,
            monthly_income: registration.monthly_income,
            approved_limit: approved_limit_for(registration.monthly_income),
            phone_number,
        })
    }

    /// Validate requested terms; `today` anchors the calendar range check for the tenure.
    pub fn terms_from_application(
        &self,
        application: LoanApplication,
        today: NaiveDate,
    ) -> Result<LoanTerms, ValidationError> {
        let LoanApplication {
            customer_id,
            loan_amount,
            interest_rate,
            tenure,
        } = application;

        if !loan_amount.is_finite() || loan_amount <= 0.0 {
            return Err(ValidationError::InvalidLoanAmount { found: loan_amount });
        }
        if !interest_rate.is_finite() || interest_rate < 0.0 {
            return Err(ValidationError::InvalidInterestRate {
                found: interest_rate,
            });
        }
        if tenure == 0 {
            return Err(ValidationError::ZeroTenure);
        }
        end_date_for(today, tenure)?;

        Ok(LoanTerms {
            customer_id,
            loan_amount,
            interest_rate,
            tenure,
        })
    }
}

/// `start` plus `tenure` calendar months, clamped to month ends like the usual date arithmetic.
pub fn end_date_for(start: NaiveDate, tenure: u32) -> Result<NaiveDate, ValidationError> {
    start
        .checked_add_months(Months::new(tenure))
        .ok_or(ValidationError::TenureOutOfRange { tenure })
}

fn required(value: String, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::BlankField { field })
    } else {
        Ok(trimmed.to_string())
    }
}
