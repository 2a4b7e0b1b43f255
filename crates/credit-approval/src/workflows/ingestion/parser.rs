use std::io::Read;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use tracing::warn;

use super::IngestionError;
use crate::workflows::lending::domain::{Customer, CustomerId, Loan, LoanId};

pub(crate) const CUSTOMER_COLUMNS: [&str; 7] = [
    "Customer ID",
    "First Name",
    "Last Name",
    "Age",
    "Phone Number",
    "Monthly Salary",
    "Approved Limit",
];

pub(crate) const LOAN_COLUMNS: [&str; 9] = [
    "Customer ID",
    "Loan ID",
    "Loan Amount",
    "Tenure",
    "Interest Rate",
    "Monthly payment",
    "EMIs paid on Time",
    "Date of Approval",
    "End Date",
];

/// Rows that deserialized cleanly, with the number of rows dropped along the way.
#[derive(Debug)]
pub(crate) struct ParsedRows<T> {
    pub(crate) rows: Vec<T>,
    pub(crate) skipped: usize,
}

/// Parse every row, logging and skipping the ones that fail to deserialize.
///
/// Missing header columns and I/O failures abort the whole file.
pub(crate) fn parse_rows<R, T>(
    reader: R,
    required: &[&'static str],
    source: &str,
) -> Result<ParsedRows<T>, IngestionError>
where
    R: Read,
    T: DeserializeOwned,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    for &column in required {
        if !headers.iter().any(|header| clean_header(header) == column) {
            return Err(IngestionError::MissingColumn { column });
        }
    }
    let cleaned: csv::StringRecord = headers.iter().map(clean_header).collect();
    csv_reader.set_headers(cleaned);

    let mut rows = Vec::new();
    let mut skipped = 0;

    for (index, record) in csv_reader.deserialize::<T>().enumerate() {
        match record {
            Ok(row) => rows.push(row),
            Err(err) if err.is_io_error() => return Err(err.into()),
            Err(err) => {
                skipped += 1;
                warn!(source, row = index + 1, error = %err, "skipping malformed row");
            }
        }
    }

    Ok(ParsedRows { rows, skipped })
}

fn clean_header(value: &str) -> &str {
    value.trim_start_matches('\u{feff}').trim()
}

#[derive(Debug, Deserialize)]
pub(crate) struct CustomerRow {
    #[serde(rename = "Customer ID", deserialize_with = "whole_number")]
    pub(crate) customer_id: u64,
    #[serde(rename = "First Name")]
    first_name: String,
    #[serde(rename = "Last Name")]
    last_name: String,
    #[serde(rename = "Age", deserialize_with = "whole_number")]
    age: u8,
    #[serde(rename = "Phone Number")]
    phone_number: String,
    #[serde(rename = "Monthly Salary", deserialize_with = "whole_number")]
    monthly_income: u64,
    #[serde(rename = "Approved Limit", deserialize_with = "whole_number")]
    approved_limit: u64,
}

impl CustomerRow {
    pub(crate) fn into_customer(self) -> Customer {
        Customer {
            customer_id: CustomerId(self.customer_id),
            first_name: self.first_name,
            last_name: self.last_name,
            age: self.age,
            monthly_income: self.monthly_income,
            approved_limit: self.approved_limit,
            phone_number: self.phone_number,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoanRow {
    #[serde(rename = "Customer ID", deserialize_with = "whole_number")]
    pub(crate) customer_id: u64,
    #[serde(rename = "Loan ID", deserialize_with = "whole_number")]
    pub(crate) loan_id: u64,
    #[serde(rename = "Loan Amount")]
    loan_amount: f64,
    #[serde(rename = "Tenure", deserialize_with = "whole_number")]
    tenure: u32,
    #[serde(rename = "Interest Rate")]
    interest_rate: f64,
    #[serde(rename = "Monthly payment")]
    monthly_repayment: f64,
    #[serde(rename = "EMIs paid on Time", deserialize_with = "whole_number")]
    emis_paid_on_time: u32,
    #[serde(rename = "Date of Approval")]
    date_of_approval: String,
    #[serde(rename = "End Date")]
    end_date: String,
}

impl LoanRow {
    /// Convert into a stored loan; ingested loans are always approved.
    pub(crate) fn into_loan(self) -> Result<Loan, String> {
        let date_of_approval = parse_date(&self.date_of_approval)
            .ok_or_else(|| format!("invalid Date of Approval '{}'", self.date_of_approval))?;
        let end_date = parse_date(&self.end_date)
            .ok_or_else(|| format!("invalid End Date '{}'", self.end_date))?;

        Ok(Loan {
            loan_id: LoanId(self.loan_id),
            customer_id: CustomerId(self.customer_id),
            loan_amount: self.loan_amount,
            tenure: self.tenure,
            interest_rate: self.interest_rate,
            monthly_repayment: self.monthly_repayment,
            emis_paid_on_time: self.emis_paid_on_time,
            date_of_approval,
            end_date,
            loan_approved: true,
        })
    }
}

/// Integers exported from spreadsheets frequently carry a trailing `.0`.
fn whole_number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64>,
{
    let raw = String::deserialize(deserializer)?;
    let trimmed = raw.trim();

    let value = match trimmed.parse::<u64>() {
        Ok(value) => value,
        Err(_) => {
            let float = trimmed
                .parse::<f64>()
                .map_err(|_| serde::de::Error::custom(format!("'{raw}' is not a number")))?;
            if !float.is_finite() || float < 0.0 || float.fract() != 0.0 || float > u64::MAX as f64
            {
                return Err(serde::de::Error::custom(format!(
                    "'{raw}' is not a whole number"
                )));
            }
            float as u64
        }
    };

    T::try_from(value).map_err(|_| serde::de::Error::custom(format!("'{raw}' is out of range")))
}

pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    parse_datetime(value).map(|dt| dt.date())
}

fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }

    for format in ["%Y-%m-%d", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    None
}
