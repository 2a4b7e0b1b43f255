use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{error, info};

use super::{CustomerImporter, IngestionError, IngestionReport, LoanImporter};
use crate::config::IngestionConfig;
use crate::workflows::lending::repository::{CustomerRepository, LoanRepository};

/// Outcome of one ingestion run. A missing report means the file was not configured.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestionSummary {
    pub customers: Option<IngestionReport>,
    pub loans: Option<IngestionReport>,
    pub failures: Vec<String>,
}

impl IngestionSummary {
    pub fn succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Runs the customer import followed by the loan import against shared repositories.
pub struct IngestionJobs<C, L> {
    customers: Arc<C>,
    loans: Arc<L>,
}

impl<C, L> Clone for IngestionJobs<C, L> {
    fn clone(&self) -> Self {
        Self {
            customers: Arc::clone(&self.customers),
            loans: Arc::clone(&self.loans),
        }
    }
}

impl<C, L> IngestionJobs<C, L>
where
    C: CustomerRepository + 'static,
    L: LoanRepository + 'static,
{
    pub fn new(customers: Arc<C>, loans: Arc<L>) -> Self {
        Self { customers, loans }
    }

    /// Import both files in order. Loans run even when the customer import fails so that
    /// rows for customers already present still land.
    pub fn run(&self, sources: &IngestionConfig) -> IngestionSummary {
        let mut summary = IngestionSummary::default();

        if let Some(path) = sources.customer_data.as_deref() {
            let result = CustomerImporter::from_path(path, self.customers.as_ref());
            summary.customers = record_result("customers", path, result, &mut summary.failures);
        }

        if let Some(path) = sources.loan_data.as_deref() {
            let result =
                LoanImporter::from_path(path, self.customers.as_ref(), self.loans.as_ref());
            summary.loans = record_result("loans", path, result, &mut summary.failures);
        }

        summary
    }

    /// Run the imports on the blocking pool so request handling is not stalled.
    pub fn spawn(&self, sources: IngestionConfig) -> JoinHandle<IngestionSummary> {
        let jobs = self.clone();
        tokio::task::spawn_blocking(move || {
            let summary = jobs.run(&sources);
            info!(
                succeeded = summary.succeeded(),
                failures = summary.failures.len(),
                "background ingestion finished"
            );
            summary
        })
    }
}

fn record_result(
    source: &'static str,
    path: &Path,
    result: Result<IngestionReport, IngestionError>,
    failures: &mut Vec<String>,
) -> Option<IngestionReport> {
    match result {
        Ok(report) => {
            info!(source, path = %path.display(), imported = report.imported(), "ingested file");
            Some(report)
        }
        Err(err) => {
            error!(source, path = %path.display(), error = %err, "ingestion failed");
            failures.push(format!("{source}: {err}"));
            None
        }
    }
}
