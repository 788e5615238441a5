//! Linear-Decay Voting Power
//!
//! Voting power grows linearly with the time ACCEL has been staked:
//!
//! ```text
//! votingPower(t) = staked * t - offset
//! ```
//!
//! where `t` is seconds since the protocol epoch and `offset` accumulates
//! `amount * deposit_time` for every deposit. Both values are used as raw
//! 18-decimal mantissas, so the product stays in integer arithmetic.
//!
//! The live share (`user / total`) is interpolated inside the current
//! second so that a UI sampling it 30 times per second sees a smooth,
//! frame-to-frame consistent value. Sampling is the caller's job; nothing
//! here keeps timer state.

use accelera_common::constants::{governance, precision};
use accelera_common::{AcceleraError, AcceleraResult, Dnum, StakeSnapshot, VotingPowerQuery, I256};
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

// ============================================================================
// Core Formula
// ============================================================================

/// `staked * t - offset` on raw mantissas, at `staked`'s scale.
///
/// Negative results are valid intermediate values; clamp with
/// `Dnum::clamp_non_negative` before displaying a magnitude.
pub fn voting_power(staked: Dnum, offset: Dnum, timestamp_in_seconds: u64) -> Dnum {
    let t = I256::new(i128::from(timestamp_in_seconds));
    let value = staked.value.saturating_mul(t).saturating_sub(offset.value);
    Dnum::new(value, staked.decimals)
}

/// Voting power of a snapshot at the queried time
pub fn snapshot_voting_power(snapshot: &StakeSnapshot, query: VotingPowerQuery) -> Dnum {
    voting_power(snapshot.staked_amount, snapshot.offset, query.timestamp_in_seconds)
}

/// Linear blend `a + (b - a) * progress / PROGRESS_SCALE` in integers
fn interpolate(a: I256, b: I256, progress: I256) -> I256 {
    let scale = I256::new(i128::from(precision::PROGRESS_SCALE));
    a.saturating_add(b.saturating_sub(a).saturating_mul(progress) / scale)
}

/// Voting power at `now_millis`, interpolated between whole seconds
fn live_voting_power(staked: Dnum, offset: Dnum, now_seconds: u64, progress: I256) -> I256 {
    let current = voting_power(staked, offset, now_seconds);
    let next = voting_power(staked, offset, now_seconds + 1);
    interpolate(current.value, next.value, progress)
}

// ============================================================================
// Live Share
// ============================================================================

/// Instantaneous share of the user's voting power in the total.
///
/// Returns `None` while any input has not been loaded yet. Returns zero
/// when nothing is staked or total live voting power is zero.
pub fn live_voting_share(
    user_staked: Option<Dnum>,
    user_offset: Option<Dnum>,
    total_staked: Option<Dnum>,
    total_offset: Option<Dnum>,
    now_millis: u64,
) -> Option<Dnum> {
    let (Some(user_staked), Some(user_offset), Some(total_staked), Some(total_offset)) =
        (user_staked, user_offset, total_staked, total_offset)
    else {
        trace!("voting share inputs not loaded");
        return None;
    };

    if total_staked.is_zero() {
        return Some(Dnum::zero18());
    }

    let now_seconds = now_millis / precision::MILLIS_PER_SECOND;
    // progress of the current second, scaled to PROGRESS_SCALE
    let progress = I256::new(i128::from(
        now_millis % precision::MILLIS_PER_SECOND * precision::PROGRESS_SCALE
            / precision::MILLIS_PER_SECOND,
    ));

    let user_live = live_voting_power(user_staked, user_offset, now_seconds, progress);
    let total_live = live_voting_power(total_staked, total_offset, now_seconds, progress);

    if total_live == I256::ZERO {
        return Some(Dnum::zero18());
    }

    let share = Dnum::from_raw18(user_live)
        .checked_div(Dnum::from_raw18(total_live))
        .unwrap_or_else(|err| {
            warn!(error = %err, code = err.code(), "voting share division failed");
            Dnum::zero18()
        });
    Some(share)
}

/// `live_voting_share` over snapshots, e.g. a user's allocated stake
/// against the global counted votes
pub fn live_voting_share_of(
    user: Option<&StakeSnapshot>,
    total: Option<&StakeSnapshot>,
    now_millis: u64,
) -> Option<Dnum> {
    live_voting_share(
        user.map(|s| s.staked_amount),
        user.map(|s| s.offset),
        total.map(|s| s.staked_amount),
        total.map(|s| s.offset),
        now_millis,
    )
}

// ============================================================================
// Sampling Cadence
// ============================================================================

/// How often a caller should re-sample the live share
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct UpdateCadence {
    /// Samples per second (default 30)
    pub updates_per_second: u32,
}

impl Default for UpdateCadence {
    fn default() -> Self {
        Self {
            updates_per_second: governance::UPDATES_PER_SECOND,
        }
    }
}

impl UpdateCadence {
    /// Creates a validated cadence
    pub fn new(updates_per_second: u32) -> AcceleraResult<Self> {
        let cadence = Self { updates_per_second };
        cadence.validate()?;
        Ok(cadence)
    }

    /// Validate cadence bounds (1..=1000 samples per second)
    pub fn validate(&self) -> AcceleraResult<()> {
        if self.updates_per_second == 0 {
            return Err(AcceleraError::InvalidConfig {
                param: "updates_per_second",
                reason: "must be at least 1",
            });
        }
        if u64::from(self.updates_per_second) > precision::MILLIS_PER_SECOND {
            return Err(AcceleraError::InvalidConfig {
                param: "updates_per_second",
                reason: "must not exceed 1000",
            });
        }
        Ok(())
    }

    /// Milliseconds between two samples
    pub fn frame_interval_millis(&self) -> u64 {
        precision::MILLIS_PER_SECOND / u64::from(self.updates_per_second.max(1))
    }

    /// Returns true if a new sample is due at `now_millis`
    pub fn is_due(&self, last_sample_millis: Option<u64>, now_millis: u64) -> bool {
        match last_sample_millis {
            None => true,
            Some(last) => now_millis.saturating_sub(last) >= self.frame_interval_millis(),
        }
    }
}

// ============================================================================
// Contract Read Adapters
// ============================================================================

/// Per-user governance state as returned by `Governance.userStates`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct UserStates {
    /// Staked ACCEL not allocated to any initiative
    pub unallocated: Dnum,
    /// Offset of the unallocated stake
    pub unallocated_offset: Dnum,
    /// ACCEL allocated to initiatives (votes and vetoes)
    pub allocated: Dnum,
    /// Offset of the allocated stake
    pub allocated_offset: Dnum,
}

impl UserStates {
    /// Builds from the raw `(unallocatedACCEL, unallocatedOffset, allocatedACCEL, allocatedOffset)` tuple
    pub fn from_raw(raw: (I256, I256, I256, I256)) -> Self {
        let (unallocated, unallocated_offset, allocated, allocated_offset) = raw;
        Self {
            unallocated: Dnum::from_raw18(unallocated),
            unallocated_offset: Dnum::from_raw18(unallocated_offset),
            allocated: Dnum::from_raw18(allocated),
            allocated_offset: Dnum::from_raw18(allocated_offset),
        }
    }

    /// Total staked ACCEL (allocated plus unallocated)
    pub fn staked(&self) -> Dnum {
        self.allocated + self.unallocated
    }

    /// Snapshot of the allocated stake, which is what carries voting power
    pub fn allocated_snapshot(&self, as_of_timestamp: u64) -> StakeSnapshot {
        StakeSnapshot::new(self.allocated, self.allocated_offset, as_of_timestamp)
    }
}

/// Global counted votes as returned by `Governance.globalState`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct GlobalState {
    /// ACCEL counted toward votes
    pub counted_vote: Dnum,
    /// Offset of the counted votes
    pub counted_vote_offset: Dnum,
}

impl GlobalState {
    /// Builds from the raw `(countedVoteACCEL, countedVoteOffset)` tuple
    pub fn from_raw(raw: (I256, I256)) -> Self {
        Self {
            counted_vote: Dnum::from_raw18(raw.0),
            counted_vote_offset: Dnum::from_raw18(raw.1),
        }
    }

    /// Snapshot of the global total
    pub fn snapshot(&self, as_of_timestamp: u64) -> StakeSnapshot {
        StakeSnapshot::new(self.counted_vote, self.counted_vote_offset, as_of_timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE: i128 = 1_000_000_000_000_000_000;

    fn accel(amount: i128) -> Dnum {
        Dnum::from_i128_raw18(amount * ONE)
    }

    /// Offset of a single deposit of `amount` ACCEL at `deposit_time`
    fn offset_for(amount: i128, deposit_time: i128) -> Dnum {
        Dnum::from_i128_raw18(amount * ONE * deposit_time)
    }

    #[test]
    fn test_voting_power_formula() {
        // 10 ACCEL staked at t=1000, evaluated at t=1100 -> 10 * 100 seconds
        let vp = voting_power(accel(10), offset_for(10, 1000), 1100);
        assert_eq!(vp.value, I256::new(10 * ONE * 100));
        assert_eq!(vp.decimals, 18);
    }

    #[test]
    fn test_voting_power_can_go_negative() {
        let vp = voting_power(accel(10), offset_for(10, 1000), 900);
        assert!(vp.is_negative());
        assert!(vp.clamp_non_negative().is_zero());
    }

    #[test]
    fn test_decay_monotonicity() {
        let staked = accel(3414);
        let offset = offset_for(3414, 1_700_000_000);
        let mut previous = voting_power(staked, offset, 1_700_000_000);
        for t in [1_700_000_001u64, 1_700_000_500, 1_700_086_400, 1_800_000_000] {
            let current = voting_power(staked, offset, t);
            assert!(current > previous, "voting power must grow with time");
            previous = current;
        }
    }

    #[test]
    fn test_snapshot_voting_power() {
        let snapshot = StakeSnapshot::new(accel(2), offset_for(2, 50), 50);
        let vp = snapshot_voting_power(&snapshot, VotingPowerQuery { timestamp_in_seconds: 60 });
        assert_eq!(vp, Dnum::from_i128_raw18(2 * ONE * 10));
    }

    #[test]
    fn test_zero_stake_share_is_zero() {
        let zero = Dnum::zero18();
        let share = live_voting_share(Some(zero), Some(zero), Some(zero), Some(zero), 1_700_000_000_123);
        assert_eq!(share, Some(Dnum::zero18()));
    }

    #[test]
    fn test_zero_total_stake_with_offset_is_zero() {
        let zero = Dnum::zero18();
        let offset = accel(5);
        let share = live_voting_share(Some(zero), Some(offset), Some(zero), Some(offset), 1_700_000_000_500);
        assert_eq!(share, Some(Dnum::zero18()));
    }

    #[test]
    fn test_interpolate_saturates() {
        assert_eq!(interpolate(I256::MIN, I256::MAX, I256::ZERO), I256::MIN);
        let mid = interpolate(I256::MIN, I256::MAX, I256::new(500));
        assert!(mid > I256::MIN && mid < I256::MAX);
        assert_eq!(interpolate(I256::MAX, I256::MAX, I256::new(999)), I256::MAX);
    }

    #[test]
    fn test_missing_input_is_none() {
        let v = Some(accel(1));
        assert_eq!(live_voting_share(None, v, v, v, 0), None);
        assert_eq!(live_voting_share(v, None, v, v, 0), None);
        assert_eq!(live_voting_share(v, v, None, v, 0), None);
        assert_eq!(live_voting_share(v, v, v, None, 0), None);
    }

    #[test]
    fn test_share_of_equal_deposits() {
        // Two users deposit 50 ACCEL each at the same time; user holds half.
        let deposit_time = 1_700_000_000;
        let user = (accel(50), offset_for(50, deposit_time));
        let total = (accel(100), offset_for(100, deposit_time));
        let now_millis = (deposit_time as u64 + 3600) * 1000 + 250;

        let share = live_voting_share(Some(user.0), Some(user.1), Some(total.0), Some(total.1), now_millis)
            .unwrap();
        assert_eq!(share, Dnum::parse("0.5", 18).unwrap());
    }

    #[test]
    fn test_sole_staker_holds_everything() {
        let staked = accel(7);
        let offset = offset_for(7, 1000);
        let share = live_voting_share(Some(staked), Some(offset), Some(staked), Some(offset), 2_000_500).unwrap();
        assert_eq!(share, Dnum::parse("1", 18).unwrap());
    }

    #[test]
    fn test_sub_second_interpolation() {
        // User staked 1 ACCEL at t=0, another staker 1 ACCEL at t=10.
        let user = (accel(1), offset_for(1, 0));
        let total = (accel(2), offset_for(1, 0) + offset_for(1, 10));

        // At t=20.0: user 20, total 30
        let at_20 = live_voting_share(Some(user.0), Some(user.1), Some(total.0), Some(total.1), 20_000).unwrap();
        // At t=20.5: user 20.5, total 31
        let at_20_5 = live_voting_share(Some(user.0), Some(user.1), Some(total.0), Some(total.1), 20_500).unwrap();
        // At t=21.0: user 21, total 32
        let at_21 = live_voting_share(Some(user.0), Some(user.1), Some(total.0), Some(total.1), 21_000).unwrap();

        assert_eq!(at_20, Dnum::from_raw18(I256::new(20 * ONE)).checked_div(Dnum::from_raw18(I256::new(30 * ONE))).unwrap());
        assert_eq!(at_20_5, Dnum::parse("20.5", 18).unwrap().checked_div(Dnum::parse("31", 18).unwrap()).unwrap());
        // user share shrinks smoothly as the later staker catches up: 20/30 > 20.5/31 > 21/32
        assert!(at_20 > at_20_5 && at_20_5 > at_21);
    }

    #[test]
    fn test_live_share_of_snapshots() {
        let user = StakeSnapshot::new(accel(1), offset_for(1, 100), 100);
        let total = StakeSnapshot::new(accel(4), offset_for(4, 100), 100);
        assert_eq!(
            live_voting_share_of(Some(&user), Some(&total), 200_000),
            Some(Dnum::parse("0.25", 18).unwrap())
        );
        assert_eq!(live_voting_share_of(None, Some(&total), 200_000), None);
    }

    #[test]
    fn test_update_cadence() {
        let cadence = UpdateCadence::default();
        assert_eq!(cadence.updates_per_second, 30);
        assert_eq!(cadence.frame_interval_millis(), 33);
        assert!(cadence.is_due(None, 0));
        assert!(!cadence.is_due(Some(1_000), 1_020));
        assert!(cadence.is_due(Some(1_000), 1_033));
        assert!(UpdateCadence::new(0).is_err());
        assert!(UpdateCadence::new(1001).is_err());
        assert_eq!(UpdateCadence::new(60).unwrap().frame_interval_millis(), 16);
    }

    #[test]
    fn test_user_states_split() {
        let states = UserStates::from_raw((
            I256::new(5 * ONE),
            I256::new(5 * ONE * 10),
            I256::new(3 * ONE),
            I256::new(3 * ONE * 20),
        ));
        assert_eq!(states.staked(), accel(8));
        let snapshot = states.allocated_snapshot(30);
        assert_eq!(snapshot.staked_amount, accel(3));
        assert_eq!(snapshot_voting_power(&snapshot, VotingPowerQuery { timestamp_in_seconds: 30 }), accel(30));

        let global = GlobalState::from_raw((I256::new(3 * ONE), I256::new(3 * ONE * 20)));
        assert_eq!(global.snapshot(30), snapshot);
    }
}
