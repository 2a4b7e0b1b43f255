use serde::{Deserialize, Serialize};

use super::super::repayment::DEFAULT_COMPOUNDING_PERIODS;

/// Interest ceiling granted to scores strictly above `score_above`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateTier {
    pub score_above: f64,
    pub interest_ceiling: f64,
}

/// Thresholds and dials applied by the eligibility engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityConfig {
    /// Ordered from the highest score threshold down; scores matching no tier are rejected.
    pub rate_tiers: Vec<RateTier>,
    pub max_emi_to_income_ratio: f64,
    pub compounding_periods_per_year: u32,
}

impl EligibilityConfig {
    pub fn standard() -> Self {
        Self {
            rate_tiers: vec![
                RateTier {
                    score_above: 50.0,
                    interest_ceiling: 12.0,
                },
                RateTier {
                    score_above: 30.0,
                    interest_ceiling: 16.0,
                },
                RateTier {
                    score_above: 10.0,
                    interest_ceiling: 20.0,
                },
            ],
            max_emi_to_income_ratio: 0.5,
            compounding_periods_per_year: DEFAULT_COMPOUNDING_PERIODS,
        }
    }
}
