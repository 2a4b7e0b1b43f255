use crate::infra::InMemoryLendingStore;
use chrono::{Local, NaiveDate};
use clap::Args;
use credit_approval::config::AppConfig;
use credit_approval::error::AppError;
use credit_approval::telemetry;
use credit_approval::workflows::ingestion::{CustomerImporter, IngestionReport, LoanImporter};
use credit_approval::workflows::lending::validation::end_date_for;
use credit_approval::workflows::lending::{monthly_repayment, LendingServiceError};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct IngestArgs {
    /// Customer export (CSV)
    #[arg(long)]
    pub(crate) customer_data: PathBuf,
    /// Loan export (CSV)
    #[arg(long)]
    pub(crate) loan_data: PathBuf,
    /// Emit the reports as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct QuoteArgs {
    /// Principal requested
    #[arg(long)]
    pub(crate) loan_amount: f64,
    /// Annual interest rate in percent
    #[arg(long)]
    pub(crate) interest_rate: f64,
    /// Tenure in months
    #[arg(long)]
    pub(crate) tenure: u32,
    /// Emit the quote as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Debug, Serialize)]
struct IngestOutput {
    customers: IngestionReport,
    loans: IngestionReport,
}

#[derive(Debug, Serialize)]
pub(crate) struct Quote {
    pub(crate) loan_amount: f64,
    pub(crate) interest_rate: f64,
    pub(crate) tenure: u32,
    pub(crate) monthly_installment: f64,
    pub(crate) total_payable: f64,
    pub(crate) end_date: NaiveDate,
}

pub(crate) fn run_ingest(args: IngestArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let store = InMemoryLendingStore::default();
    let customers = CustomerImporter::from_path(&args.customer_data, &store)?;
    let loans = LoanImporter::from_path(&args.loan_data, &store, &store)?;

    let output = IngestOutput { customers, loans };
    if args.json {
        println!("{}", to_json(&output));
        return Ok(());
    }

    println!("Ingestion report");
    for (label, report) in [("customers", &output.customers), ("loans", &output.loans)] {
        println!(
            "- {label}: {} created | {} updated | {} skipped",
            report.created, report.updated, report.skipped
        );
    }
    Ok(())
}

pub(crate) fn run_quote(args: QuoteArgs) -> Result<(), AppError> {
    let quote = build_quote(&args, Local::now().date_naive())?;

    if args.json {
        println!("{}", to_json(&quote));
        return Ok(());
    }

    println!(
        "{:.2} at {:.2}% over {} months",
        quote.loan_amount, quote.interest_rate, quote.tenure
    );
    println!("- monthly installment: {:.2}", quote.monthly_installment);
    println!("- total payable: {:.2}", quote.total_payable);
    println!("- final installment due: {}", quote.end_date);
    Ok(())
}

pub(crate) fn build_quote(args: &QuoteArgs, today: NaiveDate) -> Result<Quote, AppError> {
    let monthly_installment = monthly_repayment(args.loan_amount, args.interest_rate, args.tenure)
        .map_err(LendingServiceError::from)?;
    let end_date = end_date_for(today, args.tenure).map_err(LendingServiceError::from)?;

    Ok(Quote {
        loan_amount: args.loan_amount,
        interest_rate: args.interest_rate,
        tenure: args.tenure,
        monthly_installment,
        total_payable: monthly_installment * f64::from(args.tenure),
        end_date,
    })
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|err| format!("{{\"error\":\"{err}\"}}"))
}
