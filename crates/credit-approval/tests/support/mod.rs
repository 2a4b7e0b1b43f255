#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;

use credit_approval::workflows::lending::{
    Customer, CustomerDraft, CustomerId, CustomerRepository, Loan, LoanDraft, LoanFilter, LoanId,
    LoanRepository, RepositoryError,
};

/// Single in-process store backing both repositories.
#[derive(Default)]
pub struct SharedStore {
    customers: Mutex<BTreeMap<u64, Customer>>,
    loans: Mutex<BTreeMap<u64, Loan>>,
}

impl SharedStore {
    pub fn loan_count(&self) -> usize {
        self.loans.lock().expect("loans mutex poisoned").len()
    }

    pub fn customer_count(&self) -> usize {
        self.customers.lock().expect("customers mutex poisoned").len()
    }
}

impl CustomerRepository for SharedStore {
    fn insert(&self, draft: CustomerDraft) -> Result<Customer, RepositoryError> {
        let mut guard = self.customers.lock().expect("customers mutex poisoned");
        let id = guard.keys().next_back().map_or(1, |id| id + 1);
        let customer = draft.with_id(CustomerId(id));
        guard.insert(id, customer.clone());
        Ok(customer)
    }

    fn upsert(&self, customer: Customer) -> Result<bool, RepositoryError> {
        let mut guard = self.customers.lock().expect("customers mutex poisoned");
        Ok(guard.insert(customer.customer_id.0, customer).is_none())
    }

    fn fetch(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let guard = self.customers.lock().expect("customers mutex poisoned");
        Ok(guard.get(&id.0).cloned())
    }
}

impl LoanRepository for SharedStore {
    fn insert(&self, draft: LoanDraft) -> Result<Loan, RepositoryError> {
        let mut guard = self.loans.lock().expect("loans mutex poisoned");
        let id = guard.keys().next_back().map_or(1, |id| id + 1);
        let loan = draft.with_id(LoanId(id));
        guard.insert(id, loan.clone());
        Ok(loan)
    }

    fn upsert(&self, loan: Loan) -> Result<bool, RepositoryError> {
        let mut guard = self.loans.lock().expect("loans mutex poisoned");
        Ok(guard.insert(loan.loan_id.0, loan).is_none())
    }

    fn fetch(&self, id: LoanId) -> Result<Option<Loan>, RepositoryError> {
        let guard = self.loans.lock().expect("loans mutex poisoned");
        Ok(guard.get(&id.0).cloned())
    }

    fn list_for_customer(
        &self,
        customer_id: CustomerId,
        filter: LoanFilter,
    ) -> Result<Vec<Loan>, RepositoryError> {
        let guard = self.loans.lock().expect("loans mutex poisoned");
        Ok(guard
            .values()
            .filter(|loan| loan.customer_id == customer_id && filter.matches(loan))
            .cloned()
            .collect())
    }
}

pub const CUSTOMER_CSV: &str = "\
Customer ID,First Name,Last Name,Age,Phone Number,Monthly Salary,Approved Limit
1,Aaron,Garcia,63,9629317944,90000,3300000
2,Amanda,Kaur,59,9645405374,60000,2200000
3,Chris,Lee,35,9111111111,40000,1400000
";

pub const LOAN_CSV: &str = "\
Customer ID,Loan ID,Loan Amount,Tenure,Interest Rate,Monthly payment,EMIs paid on Time,Date of Approval,End Date
1,7798,20,138,16.93,4000,104,2019-07-13,2030-12-13
1,7799,5,12,11.0,1000,12,2025-02-01,2026-02-01
2,1210,3,45,14.93,500,0,2018-02-12,2021-11-12
";

/// Write `contents` to a per-process temporary file and return its path.
pub fn write_fixture(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "credit-approval-{}-{name}",
        std::process::id()
    ));
    std::fs::write(&path, contents).expect("fixture written");
    path
}
