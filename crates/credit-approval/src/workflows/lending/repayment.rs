/// Compounding periods per year used when callers do not specify one.
pub const DEFAULT_COMPOUNDING_PERIODS: u32 = 12;

/// Failure raised when the amortization formula has no finite answer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RepaymentError {
    #[error(
        "invalid repayment computation: compound factor is {factor} for rate {annual_rate_percent}% over {tenure_months} months"
    )]
    InvalidComputation {
        annual_rate_percent: f64,
        tenure_months: u32,
        factor: f64,
    },
}

/// Fixed monthly installment with the default monthly compounding.
pub fn monthly_repayment(
    principal: f64,
    annual_rate_percent: f64,
    tenure_months: u32,
) -> Result<f64, RepaymentError> {
    monthly_repayment_with_periods(
        principal,
        annual_rate_percent,
        tenure_months,
        DEFAULT_COMPOUNDING_PERIODS,
    )
}

/// Compound-interest amortization: `P × r × (1+r)^n / ((1+r)^n − 1)` with
/// `r = rate / (periods × 100)` and `n = periods × tenure_months`.
///
/// No rounding is applied; callers round for display only.
pub fn monthly_repayment_with_periods(
    principal: f64,
    annual_rate_percent: f64,
    tenure_months: u32,
    compounding_periods_per_year: u32,
) -> Result<f64, RepaymentError> {
    let periods = f64::from(compounding_periods_per_year);
    let rate = annual_rate_percent / (periods * 100.0);
    let total_periods = periods * f64::from(tenure_months);
    let factor = (1.0 + rate).powf(total_periods);

    let invalid = || RepaymentError::InvalidComputation {
        annual_rate_percent,
        tenure_months,
        factor,
    };

    if factor == 1.0 || !factor.is_finite() {
        return Err(invalid());
    }

    let repayment = principal * rate * factor / (factor - 1.0);
    if repayment.is_finite() {
        Ok(repayment)
    } else {
        Err(invalid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_rate_is_an_invalid_computation() {
        match monthly_repayment(120_000.0, 0.0, 12) {
            Err(RepaymentError::InvalidComputation { factor, .. }) => assert_eq!(factor, 1.0),
            other => panic!("expected invalid computation, got {other:?}"),
        }
    }

    #[test]
    fn zero_tenure_is_an_invalid_computation() {
        assert!(matches!(
            monthly_repayment(120_000.0, 10.0, 0),
            Err(RepaymentError::InvalidComputation { .. })
        ));
    }

    #[test]
    fn zero_compounding_periods_are_rejected() {
        assert!(monthly_repayment_with_periods(120_000.0, 10.0, 12, 0).is_err());
    }

    #[test]
    fn matches_amortization_formula() {
        let principal = 200_000.0_f64;
        let rate = 8.0_f64 / 1200.0;
        let factor = (1.0 + rate).powf(288.0);
        let expected = principal * rate * factor / (factor - 1.0);

        let actual = monthly_repayment(principal, 8.0, 24).expect("valid terms");

        assert_eq!(actual.to_bits(), expected.to_bits());
        assert!(actual > 1_550.0 && actual < 1_580.0, "got {actual}");
    }

    #[test]
    fn repeated_calls_are_bit_identical() {
        let first = monthly_repayment(500_000.0, 11.5, 36).expect("valid terms");
        let second = monthly_repayment(500_000.0, 11.5, 36).expect("valid terms");
        assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn monotonic_in_rate() {
        let mut previous = 0.0;
        for rate in [1.0, 4.5, 8.0, 12.0, 16.0, 20.0, 35.0] {
            let repayment = monthly_repayment(250_000.0, rate, 24).expect("valid terms");
            assert!(repayment > previous, "{repayment} <= {previous} at {rate}%");
            previous = repayment;
        }
    }

    #[test]
    fn monotonic_in_principal() {
        let mut previous = 0.0;
        for principal in [1_000.0, 10_000.0, 75_000.0, 200_000.0, 1_500_000.0] {
            let repayment = monthly_repayment(principal, 12.0, 18).expect("valid terms");
            assert!(repayment > previous);
            previous = repayment;
        }
    }
}
