//! Bulk import of customer and loan records from spreadsheet exports.
//!
//! Imports upsert by the identifiers carried in the file, so re-running an import replaces
//! records instead of duplicating them. Rows whose id the store reports as a conflict (a record
//! registered through the API) are skipped.

use std::fmt;
use std::io::Read;
use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};

use crate::workflows::lending::repository::{CustomerRepository, LoanRepository, RepositoryError};

pub mod jobs;
mod parser;

pub use jobs::{IngestionJobs, IngestionSummary};

/// Row counts produced by a single import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestionReport {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
}

impl IngestionReport {
    fn record(&mut self, created: bool) {
        if created {
            self.created += 1;
        } else {
            self.updated += 1;
        }
    }

    pub fn imported(&self) -> usize {
        self.created + self.updated
    }
}

#[derive(Debug)]
pub enum IngestionError {
    Io(std::io::Error),
    Csv(csv::Error),
    MissingColumn { column: &'static str },
    Repository(RepositoryError),
}

impl fmt::Display for IngestionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestionError::Io(err) => write!(f, "failed to read ingestion file: {}", err),
            IngestionError::Csv(err) => write!(f, "invalid ingestion CSV data: {}", err),
            IngestionError::MissingColumn { column } => {
                write!(f, "ingestion file is missing the '{}' column", column)
            }
            IngestionError::Repository(err) => write!(f, "failed to store ingested record: {}", err),
        }
    }
}

impl std::error::Error for IngestionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IngestionError::Io(err) => Some(err),
            IngestionError::Csv(err) => Some(err),
            IngestionError::MissingColumn { .. } => None,
            IngestionError::Repository(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for IngestionError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for IngestionError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<RepositoryError> for IngestionError {
    fn from(err: RepositoryError) -> Self {
        Self::Repository(err)
    }
}

/// Loads the customer export, keyed by `Customer ID`.
pub struct CustomerImporter;

impl CustomerImporter {
    pub fn from_path<P, C>(path: P, customers: &C) -> Result<IngestionReport, IngestionError>
    where
        P: AsRef<Path>,
        C: CustomerRepository + ?Sized,
    {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, customers)
    }

    pub fn from_reader<R, C>(reader: R, customers: &C) -> Result<IngestionReport, IngestionError>
    where
        R: Read,
        C: CustomerRepository + ?Sized,
    {
        let parsed = parser::parse_rows::<_, parser::CustomerRow>(
            reader,
            &parser::CUSTOMER_COLUMNS,
            "customers",
        )?;

        let mut report = IngestionReport {
            skipped: parsed.skipped,
            ..IngestionReport::default()
        };

        for row in parsed.rows {
            let customer_id = row.customer_id;
            match customers.upsert(row.into_customer()) {
                Ok(created) => report.record(created),
                Err(RepositoryError::Conflict) => {
                    warn!(
                        customer_id,
                        "skipping customer row that collides with a registered customer"
                    );
                    report.skipped += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }

        info!(
            created = report.created,
            updated = report.updated,
            skipped = report.skipped,
            "customer import finished"
        );
        Ok(report)
    }
}

/// Loads the loan export, keyed by `Loan ID`. Rows whose customer is unknown are skipped.
pub struct LoanImporter;

impl LoanImporter {
    pub fn from_path<P, C, L>(
        path: P,
        customers: &C,
        loans: &L,
    ) -> Result<IngestionReport, IngestionError>
    where
        P: AsRef<Path>,
        C: CustomerRepository + ?Sized,
        L: LoanRepository + ?Sized,
    {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, customers, loans)
    }

    pub fn from_reader<R, C, L>(
        reader: R,
        customers: &C,
        loans: &L,
    ) -> Result<IngestionReport, IngestionError>
    where
        R: Read,
        C: CustomerRepository + ?Sized,
        L: LoanRepository + ?Sized,
    {
        let parsed =
            parser::parse_rows::<_, parser::LoanRow>(reader, &parser::LOAN_COLUMNS, "loans")?;

        let mut report = IngestionReport {
            skipped: parsed.skipped,
            ..IngestionReport::default()
        };

        for row in parsed.rows {
            let loan_id = row.loan_id;
            let customer_id = row.customer_id;

            let loan = match row.into_loan() {
                Ok(loan) => loan,
                Err(reason) => {
                    warn!(loan_id, %reason, "skipping loan row");
                    report.skipped += 1;
                    continue;
                }
            };

            if customers.fetch(loan.customer_id)?.is_none() {
                warn!(loan_id, customer_id, "skipping loan for unknown customer");
                report.skipped += 1;
                continue;
            }

            match loans.upsert(loan) {
                Ok(created) => report.record(created),
                Err(RepositoryError::Conflict) => {
                    warn!(loan_id, "skipping loan row that collides with an originated loan");
                    report.skipped += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }

        info!(
            created = report.created,
            updated = report.updated,
            skipped = report.skipped,
            "loan import finished"
        );
        Ok(report)
    }
}
