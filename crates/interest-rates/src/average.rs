//! Average Interest Rate
//!
//! Debt-weighted mean of the per-rate brackets, shown next to the chart.

use accelera_common::{AcceleraError, AcceleraResult, Dnum, RateDebtBracket};

/// Debt-weighted mean interest rate, `sum(rate * debt) / sum(debt)`.
///
/// Zero when there is no debt at all.
pub fn average_interest_rate(brackets: &[RateDebtBracket]) -> AcceleraResult<Dnum> {
    let mut total_debt = Dnum::zero18();
    let mut weighted_rate = Dnum::zero18();

    for bracket in brackets {
        if bracket.total_debt.is_negative() {
            return Err(AcceleraError::InvalidInput {
                param: "total_debt",
                reason: "must not be negative",
            });
        }
        total_debt = total_debt.checked_add(bracket.total_debt)?;
        weighted_rate = weighted_rate.checked_add(bracket.rate.checked_mul(bracket.total_debt)?)?;
    }

    if total_debt.is_zero() {
        return Ok(Dnum::zero18());
    }
    weighted_rate.checked_div(total_debt)
}
