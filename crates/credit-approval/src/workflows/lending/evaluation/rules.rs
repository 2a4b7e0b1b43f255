use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::super::domain::Loan;

const PAID_ON_TIME_WEIGHT: f64 = 5.0;
const LOAN_COUNT_WEIGHT: f64 = 2.0;
const CURRENT_YEAR_WEIGHT: f64 = 3.0;
const APPROVED_VOLUME_WEIGHT: f64 = 4.0;

/// History signals contributing to the credit score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    PaidOnTime,
    LoanCount,
    CurrentYearActivity,
    ApprovedVolume,
}

impl ScoreFactor {
    pub const fn weight(self) -> f64 {
        match self {
            Self::PaidOnTime => PAID_ON_TIME_WEIGHT,
            Self::LoanCount => LOAN_COUNT_WEIGHT,
            Self::CurrentYearActivity => CURRENT_YEAR_WEIGHT,
            Self::ApprovedVolume => APPROVED_VOLUME_WEIGHT,
        }
    }
}

/// Discrete contribution to a credit score, kept for audit trails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: ScoreFactor,
    pub observed: f64,
    pub score: f64,
}

/// Weighted sum of the history signals plus the trail that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditScore {
    pub total: f64,
    pub components: Vec<ScoreComponent>,
}

pub(crate) fn score_history(history: &[Loan], today: NaiveDate) -> CreditScore {
    let current_year = today.year();

    let paid_on_time = history.iter().filter(|loan| loan.paid_on_time()).count();
    let loans_this_year = history
        .iter()
        .filter(|loan| loan.date_of_approval.year() == current_year)
        .count();
    let approved_volume: f64 = history.iter().map(|loan| loan.loan_amount).sum();

    let observations = [
        (ScoreFactor::PaidOnTime, paid_on_time as f64),
        (ScoreFactor::LoanCount, history.len() as f64),
        (ScoreFactor::CurrentYearActivity, loans_this_year as f64),
        (ScoreFactor::ApprovedVolume, approved_volume),
    ];

    let components: Vec<ScoreComponent> = observations
        .into_iter()
        .map(|(factor, observed)| ScoreComponent {
            factor,
            observed,
            score: observed * factor.weight(),
        })
        .collect();
    let total = components.iter().map(|component| component.score).sum();

    CreditScore { total, components }
}
