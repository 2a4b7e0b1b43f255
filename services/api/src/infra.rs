use credit_approval::workflows::lending::{
    Customer, CustomerDraft, CustomerId, CustomerRepository, Loan, LoanDraft, LoanFilter, LoanId,
    LoanRepository, RepositoryError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local record store. Identifiers are allocated as one past the largest known id.
///
/// Records created through `insert` belong to the API: an import that later carries the same id
/// gets `RepositoryError::Conflict` instead of overwriting them.
#[derive(Default, Clone)]
pub(crate) struct InMemoryLendingStore {
    customers: Arc<Mutex<Records<CustomerId, Customer>>>,
    loans: Arc<Mutex<Records<LoanId, Loan>>>,
}

struct Records<K, V> {
    rows: HashMap<K, V>,
    inserted: HashSet<K>,
}

impl<K, V> Default for Records<K, V> {
    fn default() -> Self {
        Self {
            rows: HashMap::new(),
            inserted: HashSet::new(),
        }
    }
}

impl<K: Copy + Eq + Hash, V> Records<K, V> {
    fn next_id(&self, raw: impl Fn(&K) -> u64) -> u64 {
        self.rows.keys().map(raw).max().unwrap_or(0) + 1
    }

    fn insert(&mut self, id: K, value: V) {
        self.inserted.insert(id);
        self.rows.insert(id, value);
    }

    fn upsert(&mut self, id: K, value: V) -> Result<bool, RepositoryError> {
        if self.inserted.contains(&id) {
            return Err(RepositoryError::Conflict);
        }
        Ok(self.rows.insert(id, value).is_none())
    }
}

impl CustomerRepository for InMemoryLendingStore {
    fn insert(&self, draft: CustomerDraft) -> Result<Customer, RepositoryError> {
        let mut guard = self.customers.lock().expect("customer store mutex poisoned");
        let customer = draft.with_id(CustomerId(guard.next_id(|id| id.0)));
        guard.insert(customer.customer_id, customer.clone());
        Ok(customer)
    }

    fn upsert(&self, customer: Customer) -> Result<bool, RepositoryError> {
        let mut guard = self.customers.lock().expect("customer store mutex poisoned");
        guard.upsert(customer.customer_id, customer)
    }

    fn fetch(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let guard = self.customers.lock().expect("customer store mutex poisoned");
        Ok(guard.rows.get(&id).cloned())
    }
}

impl LoanRepository for InMemoryLendingStore {
    fn insert(&self, draft: LoanDraft) -> Result<Loan, RepositoryError> {
        let mut guard = self.loans.lock().expect("loan store mutex poisoned");
        let loan = draft.with_id(LoanId(guard.next_id(|id| id.0)));
        guard.insert(loan.loan_id, loan.clone());
        Ok(loan)
    }

    fn upsert(&self, loan: Loan) -> Result<bool, RepositoryError> {
        let mut guard = self.loans.lock().expect("loan store mutex poisoned");
        guard.upsert(loan.loan_id, loan)
    }

    fn fetch(&self, id: LoanId) -> Result<Option<Loan>, RepositoryError> {
        let guard = self.loans.lock().expect("loan store mutex poisoned");
        Ok(guard.rows.get(&id).cloned())
    }

    fn list_for_customer(
        &self,
        customer_id: CustomerId,
        filter: LoanFilter,
    ) -> Result<Vec<Loan>, RepositoryError> {
        let guard = self.loans.lock().expect("loan store mutex poisoned");
        Ok(guard
            .rows
            .values()
            .filter(|loan| loan.customer_id == customer_id && filter.matches(loan))
            .cloned()
            .collect())
    }
}
