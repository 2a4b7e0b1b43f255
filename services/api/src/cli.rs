use crate::commands::{run_ingest, run_quote, IngestArgs, QuoteArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use credit_approval::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "credit-approval-api",
    about = "Serve credit eligibility and loan origination, or run ingestion from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Import customer and loan exports into a scratch store and print the reports
    Ingest(IngestArgs),
    /// Print the monthly installment for a set of loan terms
    Quote(QuoteArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Customer export loaded in the background at startup
    #[arg(long)]
    pub(crate) customer_data: Option<PathBuf>,
    /// Loan export loaded in the background at startup
    #[arg(long)]
    pub(crate) loan_data: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Ingest(args) => run_ingest(args),
        Command::Quote(args) => run_quote(args),
    }
}
