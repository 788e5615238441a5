//! Redemption positioning
//!
//! Redemptions consume debt from the lowest interest rate upward, so the
//! debt sitting below a borrower's rate is how much must be redeemed
//! before the borrower is hit.

use core::ops::Sub;

use accelera_common::{AcceleraError, AcceleraResult, Dnum, RateChartBucket, RateDebtBracket};
use tracing::warn;

/// Sum of `total_debt` over the entries before position `index`.
///
/// `None` marks a missing bracket. The sum stops at the first one, even
/// if populated entries follow it.
pub fn debt_before_rate_bucket_index<I>(brackets: I, index: usize) -> Dnum
where
    I: IntoIterator<Item = Option<RateDebtBracket>>,
{
    let mut debt = Dnum::zero18();
    for (position, bracket) in brackets.into_iter().take(index).enumerate() {
        let Some(bracket) = bracket else {
            warn!(position, index, "missing rate bracket, debt before index is partial");
            break;
        };
        debt = debt + bracket.total_debt;
    }
    debt
}

/// `debt_before_rate_bucket_index` over a dense, rate-sorted slice
pub fn debt_before_index(brackets: &[RateDebtBracket], index: usize) -> Dnum {
    debt_before_rate_bucket_index(brackets.iter().copied().map(Some), index)
}

fn abs_diff<T>(a: T, b: T) -> T
where
    T: Ord + Copy + Sub<Output = T>,
{
    if a > b {
        a - b
    } else {
        b - a
    }
}

/// Index of the rate closest to `rate` in an ascending list.
///
/// At or below the first rate this is `0`. At or above the last rate this
/// is `1`, not the last index. Otherwise the scan stops just before the
/// distance to `rate` starts increasing.
pub fn find_closest_rate_index<T>(sorted_rates: &[T], rate: T) -> AcceleraResult<usize>
where
    T: Ord + Copy + Sub<Output = T>,
{
    let (Some(&first), Some(&last)) = (sorted_rates.first(), sorted_rates.last()) else {
        return Err(AcceleraError::EmptyRates);
    };

    if rate <= first {
        return Ok(0);
    }
    if rate >= last {
        return Ok(1);
    }

    let mut diff = abs_diff(first, rate);
    for (index, next_rate) in sorted_rates.iter().skip(1).enumerate() {
        let next_diff = abs_diff(*next_rate, rate);
        if next_diff > diff {
            return Ok(index);
        }
        diff = next_diff;
    }

    Ok(sorted_rates.len() - 1)
}

/// Debt redeemed before a borrower at `rate` is reached: the debt in
/// front of the last bucket whose lower bound is at or below `rate`.
///
/// `None` when `rate` is below the first bucket.
pub fn redemption_position(chart: &[RateChartBucket], rate: Dnum) -> Option<Dnum> {
    let end = chart.partition_point(|bucket| bucket.rate_lower_bound <= rate);
    end.checked_sub(1).map(|i| chart[i].debt_in_front)
}
