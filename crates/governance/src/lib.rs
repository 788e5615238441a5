//! Accelera Governance
//!
//! Voting power accounting for ACCEL stakers.
//!
//! Voting power grows linearly with time staked: a position is stored as
//! `(staked, offset)` and its power at time `t` is `staked * t - offset`.
//! Depositing at `t0` adds `amount * t0` to the offset, so fresh stake
//! starts at zero power and accrues from there.
//!
//! - **Voting power** (`voting_power`): point-in-time power and the
//!   sub-second interpolated live share of a user in the total
//! - **Ledger** (`ledger`): rebuilds stake snapshots by replaying
//!   Governance contract events
//! - **Epochs** (`epoch`): voting/cutoff periods and initiative status

pub mod epoch;
pub mod events;
pub mod ledger;
pub mod voting_power;


// Re-exports for convenience
pub use epoch::{EpochParams, EpochState, InitiativeStatus, TimeRemaining, VotingPeriod};
pub use events::{EventType, GovernanceEvent};
pub use ledger::{GovernanceAllocation, GovernanceStats, GovernanceUser, InitiativeRecord, StakeLedger};
pub use voting_power::*;
