//! Interest rate chart configuration.

use accelera_common::constants::interest_rate;
use accelera_common::{AcceleraError, AcceleraResult, Dnum};
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// Rate window and step sizes of the interest rate chart.
///
/// Every field must share one decimal scale; bracket rates are normalized
/// to that scale before lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct RateChartConfig {
    /// First bucket lower bound
    pub rate_start: Dnum,
    /// Last bucket lower bound, inclusive
    pub rate_end: Dnum,
    /// Fine steps are used while the current rate is below this
    pub rate_precise_until: Dnum,
    /// Fine step; raw brackets are spaced by this
    pub increment_precise: Dnum,
    /// Coarse step
    pub increment_normal: Dnum,
}

impl Default for RateChartConfig {
    fn default() -> Self {
        Self {
            rate_start: Dnum::from_i128_raw18(interest_rate::START),
            rate_end: Dnum::from_i128_raw18(interest_rate::END),
            rate_precise_until: Dnum::from_i128_raw18(interest_rate::PRECISE_UNTIL),
            increment_precise: Dnum::from_i128_raw18(interest_rate::INCREMENT_PRECISE),
            increment_normal: Dnum::from_i128_raw18(interest_rate::INCREMENT_NORMAL),
        }
    }
}

impl RateChartConfig {
    /// Scale shared by every rate in this config
    pub fn decimals(&self) -> u8 {
        self.rate_start.decimals
    }

    /// Returns true if `rate` lies inside `[rate_start, rate_end]`
    pub fn contains(&self, rate: Dnum) -> bool {
        rate >= self.rate_start && rate <= self.rate_end
    }

    /// Step from `rate` to the next bucket lower bound
    pub fn step_at(&self, rate: Dnum) -> Dnum {
        if rate < self.rate_precise_until {
            self.increment_precise
        } else {
            self.increment_normal
        }
    }

    /// Checks that every rate shares one scale, the window is ordered and
    /// non-negative, and the coarse step is a positive multiple of the fine one
    pub fn validate(&self) -> AcceleraResult<()> {
        let decimals = self.decimals();
        let same_scale = [
            self.rate_end,
            self.rate_precise_until,
            self.increment_precise,
            self.increment_normal,
        ]
        .iter()
        .all(|d| d.decimals == decimals);
        if !same_scale {
            return Err(AcceleraError::InvalidConfig {
                param: "decimals",
                reason: "all rates must share one scale",
            });
        }

        if self.rate_start.is_negative() {
            return Err(AcceleraError::InvalidConfig {
                param: "rate_start",
                reason: "must not be negative",
            });
        }
        if self.rate_start > self.rate_end {
            return Err(AcceleraError::InvalidConfig {
                param: "rate_end",
                reason: "must not be below rate_start",
            });
        }

        let zero = Dnum::zero(decimals);
        if self.increment_precise <= zero {
            return Err(AcceleraError::InvalidConfig {
                param: "increment_precise",
                reason: "must be positive",
            });
        }
        // coarse buckets are summed in fine steps
        if self.increment_normal <= zero
            || self.increment_normal.value % self.increment_precise.value != accelera_common::I256::ZERO
        {
            return Err(AcceleraError::InvalidConfig {
                param: "increment_normal",
                reason: "must be a positive multiple of increment_precise",
            });
        }
        Ok(())
    }
}
