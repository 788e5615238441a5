//! Interest Rate Chart
//!
//! Aggregates per-rate debt brackets into fixed-resolution chart buckets.
//!
//! ## Algorithm
//!
//! 1. Index in-window bracket debt by the canonical JSON form of the rate
//!    (`["<mantissa>",<decimals>]`), so lookups are exact matches
//! 2. Walk bucket lower bounds from `rate_start` to `rate_end` inclusive,
//!    with a fine step below `rate_precise_until` and a coarse step above
//! 3. Inside each bucket, sub-walk in fine steps and sum every lookup,
//!    so coarse buckets still collect every fine-grid bracket
//! 4. Emit the bucket with the debt of every bucket below it
//!
//! Brackets must lie on the fine grid anchored at `rate_start`; off-grid
//! brackets count toward the totals but never land in a bucket. Brackets
//! that name the same rate at different scales are summed.

use std::collections::HashMap;

use accelera_common::{AcceleraResult, Dnum, RateChartBucket, RateDebtBracket, I256};
use tracing::{debug, trace, warn};

use crate::config::RateChartConfig;

/// Build the chart series for `brackets` over the window in `config`.
pub fn interest_rate_chart(
    brackets: &[RateDebtBracket],
    config: &RateChartConfig,
) -> AcceleraResult<Vec<RateChartBucket>> {
    config.validate()?;
    let decimals = config.decimals();

    // ============ Index brackets ============

    let mut debt_by_rate: HashMap<String, Dnum> = HashMap::with_capacity(brackets.len());
    let mut total_debt = Dnum::zero18();
    let mut highest_debt = Dnum::zero18();

    for bracket in brackets {
        if !config.contains(bracket.rate) {
            continue;
        }

        total_debt = total_debt + bracket.total_debt;

        // a rate truncated by the rescale is off the grid too
        let rate = bracket.rate.set_decimals(decimals)?;
        let off_grid = rate != bracket.rate
            || (rate.value - config.rate_start.value) % config.increment_precise.value != I256::ZERO;
        if off_grid {
            warn!(rate = %bracket.rate, "bracket off the fine rate grid will not be charted");
            continue;
        }

        // the same rate at different scales shares one key
        let debt = debt_by_rate.entry(rate.to_json()).or_insert_with(Dnum::zero18);
        *debt = *debt + bracket.total_debt;
        if *debt > highest_debt {
            highest_debt = *debt;
        }
    }

    // ============ Walk buckets ============

    let mut chart = Vec::new();
    let mut running_debt = Dnum::zero18();
    let mut current_rate = config.rate_start;

    while current_rate <= config.rate_end {
        let next_rate = current_rate + config.step_at(current_rate);

        let mut aggregated_debt = Dnum::zero18();
        let mut step_rate = current_rate;
        while step_rate < next_rate {
            if let Some(debt) = debt_by_rate.get(&step_rate.to_json()) {
                aggregated_debt = aggregated_debt + *debt;
            }
            step_rate = step_rate + config.increment_precise;
        }

        let relative_size = if total_debt.is_zero() {
            0.0
        } else {
            aggregated_debt
                .checked_div(highest_debt)
                .map(|ratio| ratio.to_f64())
                .unwrap_or(0.0)
        };

        trace!(
            rate = %current_rate,
            debt = %aggregated_debt,
            debt_in_front = %running_debt,
            "chart bucket"
        );

        chart.push(RateChartBucket {
            rate_lower_bound: current_rate,
            aggregated_debt,
            debt_in_front: running_debt,
            relative_size,
        });

        running_debt = running_debt + aggregated_debt;
        current_rate = next_rate;
    }

    debug!(
        brackets = brackets.len(),
        indexed = debt_by_rate.len(),
        buckets = chart.len(),
        total_debt = %total_debt,
        "interest rate chart built"
    );

    Ok(chart)
}
