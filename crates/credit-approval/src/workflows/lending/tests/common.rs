use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::lending::domain::{
    Customer, CustomerDraft, CustomerId, CustomerRegistration, Loan, LoanApplication, LoanDraft,
    LoanId, LoanTerms,
};
use crate::workflows::lending::evaluation::{EligibilityConfig, EligibilityEngine};
use crate::workflows::lending::repository::{
    CustomerRepository, LoanFilter, LoanRepository, RepositoryError,
};
use crate::workflows::lending::{lending_router, LendingService};

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date")
}

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn customer(id: u64, monthly_income: u64) -> Customer {
    Customer {
        customer_id: CustomerId(id),
        first_name: "Asha".to_string(),
        last_name: "Rao".to_string(),
        age: 34,
        monthly_income,
        approved_limit: monthly_income * 36,
        phone_number: "9876543210".to_string(),
    }
}

pub(super) fn loan(id: u64, customer_id: u64, loan_amount: f64) -> Loan {
    Loan {
        loan_id: LoanId(id),
        customer_id: CustomerId(customer_id),
        loan_amount,
        tenure: 24,
        interest_rate: 11.0,
        monthly_repayment: 0.0,
        emis_paid_on_time: 0,
        date_of_approval: date(2022, 3, 1),
        end_date: date(2024, 3, 1),
        loan_approved: true,
    }
}

pub(super) fn registration() -> CustomerRegistration {
    CustomerRegistration {
        first_name: "Meera".to_string(),
        last_name: "Iyer".to_string(),
        age: 29,
        monthly_income: 100_000,
        phone_number: "9123456780".to_string(),
    }
}

pub(super) fn application(customer_id: u64) -> LoanApplication {
    LoanApplication {
        customer_id: CustomerId(customer_id),
        loan_amount: 200_000.0,
        interest_rate: 8.0,
        tenure: 24,
    }
}

pub(super) fn terms(customer_id: u64, interest_rate: f64) -> LoanTerms {
    LoanTerms {
        customer_id: CustomerId(customer_id),
        loan_amount: 200_000.0,
        interest_rate,
        tenure: 24,
    }
}

pub(super) fn engine() -> EligibilityEngine {
    EligibilityEngine::new(EligibilityConfig::standard())
}

pub(super) fn build_service() -> (
    LendingService<MemoryStore, MemoryStore>,
    Arc<MemoryStore>,
) {
    let store = Arc::new(MemoryStore::default());
    let service = LendingService::new(store.clone(), store.clone(), EligibilityConfig::standard());
    (service, store)
}

pub(super) fn lending_router_with_service(
    service: LendingService<MemoryStore, MemoryStore>,
) -> axum::Router {
    lending_router(Arc::new(service))
}

/// Single in-memory store backing both repositories, counting loan writes.
#[derive(Default)]
pub(super) struct MemoryStore {
    customers: Mutex<BTreeMap<CustomerId, Customer>>,
    loans: Mutex<BTreeMap<LoanId, Loan>>,
    loan_writes: AtomicUsize,
}

impl MemoryStore {
    pub(super) fn with_records(customers: Vec<Customer>, loans: Vec<Loan>) -> Self {
        let store = Self::default();
        {
            let mut guard = store.customers.lock().expect("customer mutex poisoned");
            for customer in customers {
                guard.insert(customer.customer_id, customer);
            }
        }
        {
            let mut guard = store.loans.lock().expect("loan mutex poisoned");
            for loan in loans {
                guard.insert(loan.loan_id, loan);
            }
        }
        store
    }

    pub(super) fn loan_writes(&self) -> usize {
        self.loan_writes.load(Ordering::SeqCst)
    }

    pub(super) fn loan_count(&self) -> usize {
        self.loans.lock().expect("loan mutex poisoned").len()
    }
}

impl CustomerRepository for MemoryStore {
    fn insert(&self, draft: CustomerDraft) -> Result<Customer, RepositoryError> {
        let mut guard = self.customers.lock().expect("customer mutex poisoned");
        let next = guard.keys().next_back().map_or(1, |id| id.0 + 1);
        let customer = draft.with_id(CustomerId(next));
        guard.insert(customer.customer_id, customer.clone());
        Ok(customer)
    }

    fn upsert(&self, customer: Customer) -> Result<bool, RepositoryError> {
        let mut guard = self.customers.lock().expect("customer mutex poisoned");
        Ok(guard.insert(customer.customer_id, customer).is_none())
    }

    fn fetch(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let guard = self.customers.lock().expect("customer mutex poisoned");
        Ok(guard.get(&id).cloned())
    }
}

impl LoanRepository for MemoryStore {
    fn insert(&self, draft: LoanDraft) -> Result<Loan, RepositoryError> {
        let mut guard = self.loans.lock().expect("loan mutex poisoned");
        let next = guard.keys().next_back().map_or(1, |id| id.0 + 1);
        let loan = draft.with_id(LoanId(next));
        guard.insert(loan.loan_id, loan.clone());
        self.loan_writes.fetch_add(1, Ordering::SeqCst);
        Ok(loan)
    }

    fn upsert(&self, loan: Loan) -> Result<bool, RepositoryError> {
        let mut guard = self.loans.lock().expect("loan mutex poisoned");
        self.loan_writes.fetch_add(1, Ordering::SeqCst);
        Ok(guard.insert(loan.loan_id, loan).is_none())
    }

    fn fetch(&self, id: LoanId) -> Result<Option<Loan>, RepositoryError> {
        let guard = self.loans.lock().expect("loan mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    fn list_for_customer(
        &self,
        customer_id: CustomerId,
        filter: LoanFilter,
    ) -> Result<Vec<Loan>, RepositoryError> {
        let guard = self.loans.lock().expect("loan mutex poisoned");
        Ok(guard
            .values()
            .filter(|loan| loan.customer_id == customer_id && filter.matches(loan))
            .cloned()
            .collect())
    }
}

pub(super) struct UnavailableStore;

impl CustomerRepository for UnavailableStore {
    fn insert(&self, _draft: CustomerDraft) -> Result<Customer, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn upsert(&self, _customer: Customer) -> Result<bool, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

impl LoanRepository for UnavailableStore {
    fn insert(&self, _draft: LoanDraft) -> Result<Loan, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn upsert(&self, _loan: Loan) -> Result<bool, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: LoanId) -> Result<Option<Loan>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_for_customer(
        &self,
        _customer_id: CustomerId,
        _filter: LoanFilter,
    ) -> Result<Vec<Loan>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
